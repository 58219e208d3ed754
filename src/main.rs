use actix_web::{middleware::Logger, web, App, HttpServer};
use file_type_converter::office::OfficeConverter;
use file_type_converter::{server, ConverterConfig, FileConverter};
use std::sync::Mutex;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = ConverterConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🦀 Starting File Type Converter Service");
    log::info!("📍 Listening on {}", config.bind_address);
    log::info!("📂 Output directory: {}", config.output_dir.display());
    log::info!("📊 Supported inputs: JPG, PNG, GIF, BMP, TXT, DOC, PDF");
    log::info!("📤 Supported outputs: JPEG, PNG, GIF, BMP, PDF, DOC");

    if !OfficeConverter::new(config.office_binary.clone()).is_available() {
        log::warn!(
            "'{}' not found; .doc to PDF conversions will fail",
            config.office_binary
        );
    }

    let converter_state = web::Data::new(Mutex::new(FileConverter::new(&config)));

    HttpServer::new(move || {
        App::new()
            .app_data(converter_state.clone())
            .wrap(Logger::default())
            .wrap(server::cors())
            .configure(server::configure)
    })
    .bind(config.bind_address)?
    .run()
    .await
}
