use std::env;
use std::path::PathBuf;

use tracefixture_eval::{CheckOptions, IntegrityChecker, render_report};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut dir: Option<PathBuf> = None;
    let mut options = CheckOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict" => options.strict = true,
            "--report" => options.report_path = args.next().map(PathBuf::from),
            _ => {
                if dir.is_none() {
                    dir = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let report = IntegrityChecker::new(options).run(&dir)?;
    println!("{}", render_report(&report, 20));
    Ok(())
}
