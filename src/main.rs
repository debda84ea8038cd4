#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tft_companion_lib::run().await
}
