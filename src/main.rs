#[actix_web::main]
async fn main() -> std::io::Result<()> {
    formularze_server::run().await
}
