use conjugacy_core::{
    Conjugacy, ConjugacyEngine, Error, FileSink, FileSource, OutputFormat, ResultSink, evaluate,
    format_plain,
};

pub struct ComputeCommandConfig<'a> {
    pub input: &'a str,
    pub output: &'a str,
    pub delimiter: &'a str,
    pub tie_break: &'a str,
    pub format: &'a str,
}

pub fn run(cfg: ComputeCommandConfig<'_>) {
    match execute(&cfg) {
        Ok(result) => println!("{}", format_plain(&result)),
        Err(e) => {
            eprintln!("{}", diagnostic(&e));
            std::process::exit(1);
        }
    }
}

/// Read, compute, write. Nothing is written unless the computation succeeds.
fn execute(cfg: &ComputeCommandConfig<'_>) -> Result<Conjugacy, Error> {
    let options = super::parse_options(cfg.delimiter);
    let engine = ConjugacyEngine::new(super::engine_config(cfg.tie_break));
    let format = cfg.format.parse::<OutputFormat>().unwrap_or_default();

    let source = FileSource::new(cfg.input, options);
    let result = evaluate(&source, &engine)?;
    FileSink::new(cfg.output, format).write(&result)?;
    log::info!("{} -> {}", cfg.input, cfg.output);
    Ok(result)
}

fn diagnostic(err: &Error) -> String {
    match err {
        Error::Input(e) => format!("Could not read the input file: {e}"),
        Error::Compute(_) if err.is_insufficient_data() => {
            "Amount of data is too small, impossible to apply the method.".to_string()
        }
        Error::Compute(e) => format!("Could not apply the method: {e}"),
        Error::Output(e) => format!("Could not save the result: {e}"),
        Error::Aborted(reason) => format!("Could not apply the method: {reason}"),
    }
}
