//! Dual-Pane Backend Entry Point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dual_pane_lib::run().await
}
