use anyhow::{Context, Result};
use boxtree_config::{Config, OnFailure, VocabularyConfig};
use boxtree_engine::{FailurePolicy, QName, Remediation, Vocabulary, apply_plan, snapshot};
use std::{env, fs, path::PathBuf, process};

struct Args {
    document: PathBuf,
    plan: PathBuf,
    skip_failures: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let skip_failures = args.iter().any(|arg| arg == "--skip-failures");
    let positional: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .collect();
    match positional.as_slice() {
        [document, plan] => Some(Args {
            document: PathBuf::from(document),
            plan: PathBuf::from(plan),
            skip_failures,
        }),
        _ => None,
    }
}

fn vocabulary(config: &VocabularyConfig) -> Vocabulary {
    let name = |local: &str| QName::new(config.namespace.as_str(), local);
    Vocabulary {
        container: name(&config.container),
        heading: name(&config.heading),
        neutral_inline: name(&config.neutral_inline),
        image_marker: name(&config.image_marker),
        emphasis: config.emphasis.iter().map(|local| name(local)).collect(),
        images: config.images.iter().map(|local| name(local)).collect(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(args) = parse_args(&args) else {
        let program_name = args.first().map(String::as_str).unwrap_or("boxtree");
        eprintln!("Usage: {program_name} <document.json> <plan.json> [--skip-failures]");
        process::exit(1);
    };

    let config_path = Config::config_path();
    let config = match Config::load()? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        None => Config::default(),
    };

    let document = fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read document {}", args.document.display()))?;
    let root = boxtree_engine::load_document(&document)
        .with_context(|| format!("Failed to load document {}", args.document.display()))?;

    let plan = fs::read_to_string(&args.plan)
        .with_context(|| format!("Failed to read plan {}", args.plan.display()))?;
    let plan: Vec<Remediation> = serde_json::from_str(&plan)
        .with_context(|| format!("Failed to parse plan {}", args.plan.display()))?;
    log::info!("Applying {} remediation steps", plan.len());

    let policy = if args.skip_failures || config.on_failure == OnFailure::Skip {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };
    let report = apply_plan(root, &plan, &vocabulary(&config.vocabulary), policy);
    for failure in &report.failures {
        log::warn!("{failure}");
    }
    let failed = !report.failures.is_empty();
    let outline = snapshot::outline(&report.root);

    match &config.output_path {
        Some(path) => fs::write(path, format!("{outline}\n"))
            .with_context(|| format!("Failed to write outline to {}", path.display()))?,
        None => println!("{outline}"),
    }

    if failed && policy == FailurePolicy::Abort {
        report.into_result()?;
    }
    Ok(())
}
