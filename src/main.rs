use anyhow::Context;
use clap::Parser;
use dealer_listings::config::{self, Command, Settings, TomlConfig};
use dealer_listings::utils::error::ErrorSeverity;
use dealer_listings::utils::logger;
use dealer_listings::{CliConfig, ListingEngine, ListingError, SearchResult, TerminalView};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 1,      // 輸入被拒絕
        ErrorSeverity::Medium => 2,   // 資料部分遺失
        ErrorSeverity::High => 1,     // 配置錯誤
        ErrorSeverity::Critical => 3, // 存儲錯誤
    }
}

fn fail(e: &ListingError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.severity()));
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置
    let toml = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(toml) => toml,
        Err(e) => fail(&e),
    };
    let settings = match Settings::resolve(toml.as_ref(), cli.data_dir.as_deref(), cli.slot.as_deref()) {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    // 初始化日誌
    match settings.log_format.as_str() {
        "json" => logger::init_json_logger(cli.verbose, settings.log_level.as_deref()),
        _ => logger::init_cli_logger(cli.verbose, settings.log_level.as_deref()),
    }
    tracing::info!("Starting dealer-listings");
    tracing::debug!("Settings: {:?}", settings);

    if let Command::Makers { maker } = &cli.command {
        match maker {
            Some(maker) => {
                let Some(name) = settings.catalog.resolve_maker(maker) else {
                    eprintln!("❌ We don't sell {}", maker);
                    std::process::exit(1);
                };
                println!("{}: {}", name, settings.catalog.models_for(name).join(", "));
            }
            None => {
                for name in settings.catalog.makers() {
                    println!("{}", name);
                }
            }
        }
        return Ok(());
    }

    let store = match config::open_store(&settings) {
        Ok(store) => store,
        Err(e) => fail(&e),
    };

    let view = TerminalView::new(std::io::stdout(), store.current_year());
    let mut engine = ListingEngine::new(store, view);
    engine.start();

    let failure = match cli.command {
        Command::Add(args) => engine.create(&args.into()).err(),
        Command::Delete {
            plate: Some(plate), ..
        } => engine.delete_plate(&plate).err(),
        Command::Delete {
            row: Some(row),
            discounted,
            ..
        } => {
            engine.toggle_discount_filter(discounted);
            engine.delete(row as usize - 1).err()
        }
        Command::Delete { .. } => unreachable!("clap requires --plate or --row"),
        Command::Search { plate } => match engine.search(&plate) {
            SearchResult::Found { .. } => None,
            SearchResult::NotFound { plate } => Some(ListingError::NotFound { plate }),
        },
        Command::List { discounted } => {
            engine.toggle_discount_filter(discounted);
            None
        }
        Command::Makers { .. } => None,
    };

    let (_, mut view) = engine.into_parts();
    view.print_table().context("failed to print listings")?;

    if let Some(e) = failure {
        tracing::debug!("Command failed: {}", e);
        std::process::exit(exit_code(e.severity()));
    }

    Ok(())
}
