use clap::Parser;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, Read};

use crate::adapters::branding::Branding;
use crate::decay::chart::ChartData;
use crate::decay::predictor::{DecayReport, ModelOutcome};
use crate::error::AppError;
use crate::models::{ModelInputs, Settings};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Residual chlorine decay prediction (EPA & Two-phase) — optional JSON output",
    long_about = None,
    allow_negative_numbers = true
)]
pub struct Args {
    #[arg(long)]
    json: bool,
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON file with inputs and optional settings; '-' reads from stdin"
    )]
    input: Option<String>,
    #[arg(
        long,
        value_name = "JSON",
        help = "Inline JSON for inputs (overrides --input)"
    )]
    inputs_json: Option<String>,
    #[arg(
        long,
        value_name = "JSON",
        help = "Inline JSON for settings (optional, supplements --inputs-json)"
    )]
    settings_json: Option<String>,
    #[arg(long, value_name = "MG_L", help = "Dissolved organic carbon [0, 10]")]
    doc: Option<f64>,
    #[arg(long, value_name = "MG_L", help = "NH3 surrogate [0, 5]")]
    nh3: Option<f64>,
    #[arg(long, value_name = "MG_L", help = "Initial chlorine [0, 5]")]
    cl0: Option<f64>,
    #[arg(long, value_name = "DEG_C", help = "Water temperature [0, 35]")]
    temp: Option<f64>,
    #[arg(long, value_name = "HOURS", help = "Prediction horizon [1, 24]")]
    horizon: Option<f64>,
    #[arg(long, value_name = "N", help = "Samples per curve")]
    points: Option<usize>,
    #[arg(long, help = "Disable the sensitivity bound curves")]
    no_bounds: bool,
    #[arg(long, value_name = "FILE", help = "Branding image")]
    logo: Option<String>,
    #[arg(
        long,
        default_value = "warn",
        help = "Log filter when RUST_LOG is unset (logs go to stderr)"
    )]
    pub log_level: String,
}

fn parse_inline_inputs(
    inputs_json: &str,
    settings_json: Option<&String>,
) -> Result<(ModelInputs, Settings), AppError> {
    let inputs: ModelInputs =
        serde_json::from_str(inputs_json).map_err(|source| AppError::ParseInputsJson { source })?;

    let settings = match settings_json {
        Some(s) => serde_json::from_str::<Settings>(s)
            .map_err(|source| AppError::ParseSettingsJson { source })?,
        None => Settings::default(),
    };

    Ok((inputs, settings))
}

fn parse_cmd_input_doc(doc: &str) -> Result<(ModelInputs, Settings), AppError> {
    let parsed: CmdInput =
        serde_json::from_str(doc).map_err(|source| AppError::ParseCmdInputJson { source })?;
    Ok((parsed.inputs, parsed.settings.unwrap_or_default()))
}

fn parse_documents(args: &Args) -> Result<(ModelInputs, Settings), AppError> {
    match (&args.inputs_json, &args.input) {
        (Some(inputs_json), _) => parse_inline_inputs(inputs_json, args.settings_json.as_ref()),
        (None, Some(path)) if path == "-" => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .map_err(|source| AppError::ReadStdin { source })?;
            parse_cmd_input_doc(&s)
        }
        (None, Some(path)) => {
            let s = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
                path: path.clone(),
                source,
            })?;
            parse_cmd_input_doc(&s)
        }
        (None, None) => match &args.settings_json {
            Some(s) => Ok((
                ModelInputs::default(),
                serde_json::from_str(s).map_err(|source| AppError::ParseSettingsJson { source })?,
            )),
            None => Ok((ModelInputs::default(), Settings::default())),
        },
    }
}

/// Resolve inputs and settings: defaults, then JSON documents, then individual flags.
pub fn parse_inputs(args: &Args) -> Result<(ModelInputs, Settings), AppError> {
    let (mut inputs, mut settings) = parse_documents(args)?;

    if let Some(v) = args.doc {
        inputs.doc = v;
    }
    if let Some(v) = args.nh3 {
        inputs.nh3 = v;
    }
    if let Some(v) = args.cl0 {
        inputs.cl0 = v;
    }
    if let Some(v) = args.temp {
        inputs.temp_c = v;
    }
    if let Some(v) = args.horizon {
        inputs.horizon_h = v;
    }
    if let Some(n) = args.points {
        settings.num_points = n;
    }
    if args.no_bounds {
        settings.sensitivity = None;
    }
    if let Some(logo) = &args.logo {
        settings.logo_path = logo.clone();
    }

    Ok((inputs, settings))
}

#[derive(serde::Deserialize)]
struct CmdInput {
    #[serde(default)]
    inputs: ModelInputs,
    #[serde(default)]
    settings: Option<Settings>,
}

#[derive(Serialize)]
pub struct CliOutput<'a> {
    pub branding: &'a Branding,
    pub report: &'a DecayReport,
    pub chart: &'a ChartData,
}

pub fn print_output(out: &CliOutput<'_>, args: &Args) -> Result<(), AppError> {
    if args.json {
        let s = serde_json::to_string_pretty(out)
            .map_err(|source| AppError::SerializeOutput { source })?;
        println!("{}", s);
    } else {
        print!("{}", out);
    }

    Ok(())
}

fn write_outcome<C>(
    f: &mut fmt::Formatter<'_>,
    model: &str,
    outcome: &ModelOutcome<C>,
    describe: impl Fn(&C) -> String,
) -> fmt::Result {
    match outcome.coefficients() {
        Some(c) => writeln!(f, "{model}: {}", describe(c)),
        None => writeln!(
            f,
            "{model}: not available ({})",
            outcome.reason().unwrap_or_default()
        ),
    }
}

impl fmt::Display for CliOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;

        writeln!(f, "{}", self.chart.title)?;
        match self.branding {
            Branding::Image {
                path,
                width,
                height,
            } => writeln!(f, "Logo: {path} ({width}x{height})")?,
            Branding::Placeholder { text } => writeln!(f, "{text}")?,
        }
        let i = &r.inputs;
        writeln!(
            f,
            "Inputs: DOC {:.3} mg/L, NH3 {:.3} mg/L, Cl0 {:.3} mg/L, T {:.1} °C, horizon {:.1} h",
            i.doc, i.nh3, i.cl0, i.temp_c, i.horizon_h
        )?;
        write_outcome(f, "EPA", &r.epa, |c| {
            format!("k1 = {:.4} 1/h, k2 = {:.4} 1/h", c.k1, c.k2)
        })?;
        write_outcome(f, "Two-phase", &r.two_phase, |c| {
            format!(
                "A = {:.4}, k1 = {:.4} 1/h, k2 = {:.4} 1/h",
                c.a, c.k1, c.k2
            )
        })?;
        if let Some(b) = &r.bounds {
            writeln!(
                f,
                "Bounds: low k1 = {:.2}, k2 = {:.2}; high k1 = {:.2}, k2 = {:.2}",
                b.bounds.k1_low, b.bounds.k2_low, b.bounds.k1_high, b.bounds.k2_high
            )?;
        }
        for m in &r.messages {
            writeln!(f, "Note: {m}")?;
        }

        let Some(first) = self.chart.series.first() else {
            return Ok(());
        };
        writeln!(f)?;
        write!(f, "{:>8}", "t (h)")?;
        for series in &self.chart.series {
            write!(f, "  {:>12}", short_label(series.label))?;
        }
        writeln!(f)?;
        for (idx, p) in first.points.iter().enumerate() {
            write!(f, "{:>8.3}", p.t_h)?;
            for series in &self.chart.series {
                write!(f, "  {:>12.5}", series.points[idx].c_mg_l)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn short_label(label: &str) -> &str {
    match label {
        "EPA Model (Original Input)" => "EPA",
        "Two-phase Model (Original Input)" => "Two-phase",
        "EPA Model Low (User Input)" => "EPA low",
        "EPA Model High (User Input)" => "EPA high",
        other => other,
    }
}
