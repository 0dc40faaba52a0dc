#[tokio::main]
async fn main() {
    events_backend::run().await;
}
