#[tokio::main]
async fn main() {
    reports_backend::run().await;
}
