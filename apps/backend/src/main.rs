#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quiz_practice_backend::run().await
}
