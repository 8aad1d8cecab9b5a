use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use textknn::{
    render_console_report, write_output, Corpus, KnnClassifier, KnnConfig, Metric, Result,
};

const USAGE: &str = "usage: build_knn <training_data> <test_data> <k> <distance 1|2> <sys_output>";

struct Args {
    train_path: String,
    test_path: String,
    config: KnnConfig,
    output_path: String,
}

/// Reads the five positional arguments. The metric selector is resolved here, before any file
/// is touched.
fn parse_args(argv: &[String]) -> std::result::Result<Args, String> {
    let [train_path, test_path, k, metric, output_path] = argv else {
        return Err(format!("expected 5 arguments, got {}", argv.len()));
    };
    let k: usize = k
        .parse()
        .map_err(|_| format!("k must be a positive integer, got `{k}`"))?;
    let metric = Metric::from_selector(metric).map_err(|e| e.to_string())?;

    Ok(Args {
        train_path: train_path.clone(),
        test_path: test_path.clone(),
        config: KnnConfig::new(k, metric),
        output_path: output_path.clone(),
    })
}

fn run(args: &Args) -> Result<()> {
    let train = Corpus::from_path(&args.train_path)?;
    let test = Corpus::from_path(&args.test_path)?;

    let result = KnnClassifier::new(args.config).run(&train, &test)?;

    write_output(&args.output_path, &result)?;
    print!(
        "{}",
        render_console_report(&result.train.confusion, &result.test.confusion)
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("error: {msg}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
