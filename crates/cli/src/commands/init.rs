//! `standin init` — Write a default config file.

use standin_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config already exists: {}", config_path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, AppConfig::default_toml())?;

    println!("Wrote default config: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set an API key:  export STANDIN_API_KEY='gsk_...'  (or GROQ_API_KEY)");
    println!("  2. Point retrieval.data_dir at a directory of <collection>.json files");
    println!("  3. Run `standin serve` or `standin ask \"who are you?\"`");

    Ok(())
}
