use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use dtree_gbdt::config::{DEFAULT_CONFIG_FILE, DEFAULT_MODEL_FILE};
use dtree_gbdt::{
    accuracy, load_samples, ErrorSummary, GbdtModel, LogObserver, LossKind, Predict,
    SampleFormat, SampleStore, TreeBuilder, TreeKind, TreeParams, GBDT,
};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("DTREE_LOG", "info"))
        .init();

    let matches = Command::new("dtree")
        .version(clap::crate_version!())
        .about("Decision tree and GBDT training")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train a model and write it as JSON")
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help("Training sample file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help("Sample file format")
                        .value_parser(["dense", "sparse", "liblinear"])
                        .default_value("dense"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(
                            "Parameter file (*.json or *.toml). DTREE_* environment \
                             variables override its values.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Output model file")
                        .default_value(DEFAULT_MODEL_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .help("Train a boosted ensemble or a single tree")
                        .value_parser(["gbdt", "classification", "regression"])
                        .default_value("gbdt"),
                )
                .arg(
                    Arg::new("loss")
                        .long("loss")
                        .help("Boosting loss; overrides the parameter file")
                        .value_parser(["ls", "lad", "logistic"]),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Score a sample file with a trained model")
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help("Sample file to score")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help("Sample file format")
                        .value_parser(["dense", "sparse", "liblinear"])
                        .default_value("dense"),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Model file written by `dtree train`")
                        .default_value(DEFAULT_MODEL_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", train_matches)) => handle_train(train_matches),
        Some(("predict", predict_matches)) => handle_predict(predict_matches),
        _ => unreachable!("subcommand_required prevents this"),
    }
}

fn sample_format(matches: &ArgMatches) -> Result<SampleFormat> {
    let name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("dense");
    Ok(name.parse()?)
}

fn load_params(matches: &ArgMatches) -> Result<TreeParams> {
    let mut params = match matches.get_one::<PathBuf>("config") {
        Some(path) => TreeParams::load_from_file(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                TreeParams::load_from_file(&fallback)?
            } else {
                TreeParams::default()
            }
        }
    };
    params.apply_environment_overrides()?;
    if let Some(loss) = matches.try_get_one::<String>("loss").ok().flatten() {
        params.loss = loss.parse()?;
    }
    params.validate()?;
    Ok(params)
}

/// Log fit statistics; logistic models also report accuracy at 0.5.
fn report_fit(model: &GbdtModel, store: &SampleStore, predictions: &[f64]) -> Result<()> {
    ErrorSummary::evaluate(store.labels(), predictions)?.log();
    if model.loss() == LossKind::Logistic {
        let probabilities = probabilities(model, store)?;
        log::info!(
            "accuracy={:.4}",
            accuracy(store.labels(), &probabilities, 0.5)?
        );
    }
    Ok(())
}

fn probabilities(model: &GbdtModel, store: &SampleStore) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(store.len());
    for i in 0..store.len() {
        out.push(model.predict_logistic(store.row(i))?);
    }
    Ok(out)
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let data: &PathBuf = matches.get_one("data").context("missing --data")?;
    let model_path: &PathBuf = matches.get_one("model").context("missing --model")?;
    let mode = matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("gbdt");

    let params = load_params(matches)?;
    log::debug!("parameters: {:?}", params);

    let store = load_samples(data, sample_format(matches)?)
        .with_context(|| format!("loading samples from {}", data.display()))?;

    let mut observer = LogObserver;
    let model = match mode {
        "classification" | "regression" => {
            let kind = if mode == "classification" {
                TreeKind::Classification
            } else {
                TreeKind::Regression
            };
            let tree = TreeBuilder::new(kind, params)?.build(store.clone(), &mut observer)?;
            log::info!(
                "{} tree: {} nodes, {} leaves, depth {}",
                kind,
                tree.num_nodes(),
                tree.num_leaves(),
                tree.depth()
            );
            GbdtModel::from_tree(tree)
        }
        _ => {
            let model = GBDT::new(params)?.train(&store, &mut observer)?;
            log::info!("{}", model.statistics());
            model
        }
    };

    let predictions = model.predict_rows(&store)?;
    report_fit(&model, &store, &predictions)?;

    model
        .save_json(model_path)
        .with_context(|| format!("writing model to {}", model_path.display()))?;
    log::info!("model written to {}", model_path.display());
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let data: &PathBuf = matches.get_one("data").context("missing --data")?;
    let model_path: &PathBuf = matches.get_one("model").context("missing --model")?;

    let model = GbdtModel::load_json(model_path)
        .with_context(|| format!("reading model from {}", model_path.display()))?;
    let store = load_samples(data, sample_format(matches)?)
        .with_context(|| format!("loading samples from {}", data.display()))?;

    let predictions = model.predict_rows(&store)?;
    let printed = if model.loss() == LossKind::Logistic {
        probabilities(&model, &store)?
    } else {
        predictions.clone()
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for p in &printed {
        writeln!(out, "{}", p)?;
    }
    out.flush()?;

    report_fit(&model, &store, &predictions)?;
    Ok(())
}
