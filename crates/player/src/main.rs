//! Character sheet player - composition root binary.

#[cfg(target_arch = "wasm32")]
fn main() {
    charsheet_player::web::boot();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use charsheet_domain::CharacterSheet;
    use charsheet_player::{run_headless, ControllerConfig};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charsheet_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ControllerConfig::from_env()?;

    let sheet = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CHARSHEET_FILE").ok())
    {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read sheet {path}"))?;
            serde_json::from_str::<CharacterSheet>(&raw)
                .with_context(|| format!("Failed to parse sheet {path}"))?
        }
        None => CharacterSheet::new("Adventurer"),
    };

    tracing::info!(name = %sheet.name, ?config, "Rendering sheet");

    let report = run_headless(&sheet, config);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
