use futures::executor::block_on;
use narwhal::{
    Algorithm, CancelToken, LayoutOptions, LayoutPosition, Point, PositionTransform,
    StyleSizeHints, TopologyDocument,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Document(narwhal::Error),
    Layout(narwhal::Error),
    Json(serde_json::Error),
    Config(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Document(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Validate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    algorithm: Algorithm,
    config: Option<String>,
    include_labels: bool,
    swap_axes: bool,
    fit: bool,
    absolute: bool,
    timeout_ms: Option<u64>,
    pretty: bool,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    positions: &'a BTreeMap<String, LayoutPosition>,
}

#[derive(Serialize)]
struct AbsoluteOut<'a> {
    positions: &'a BTreeMap<String, Point>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOut {
    nodes: usize,
    edges: usize,
    compounds: usize,
    components: usize,
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [layout] [--algorithm bfs|group] [--config <path>] [--include-labels] [--swap-axes] [--fit] [--absolute] [--timeout-ms <n>] [--pretty] [<path>|-]\n\
  narwhal-cli validate [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the topology document is read from stdin.\n\
  - layout prints {\"positions\": {...}}; children of compound nodes are relative to their parent unless --absolute is given.\n\
  - --config reads a JSON layout options document; flags given on the command line override it.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "validate" => args.command = Command::Validate,
            "--pretty" => args.pretty = true,
            "--include-labels" => args.include_labels = true,
            "--swap-axes" => args.swap_axes = true,
            "--fit" => args.fit = true,
            "--absolute" => args.absolute = true,
            "--algorithm" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.algorithm = name
                    .parse::<Algorithm>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--timeout-ms" => {
                let Some(ms) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.timeout_ms = Some(ms.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut opts = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<LayoutOptions>(&text)
                .map_err(|err| CliError::Config(format!("{path}: {err}")))?
        }
        None => LayoutOptions::default(),
    };
    if args.include_labels {
        opts.include_labels = true;
    }
    if args.fit {
        opts.fit = true;
    }
    if args.timeout_ms.is_some() {
        opts.timeout_ms = args.timeout_ms;
    }
    if args.swap_axes {
        opts.transform = PositionTransform::swap_axes();
    }
    Ok(opts)
}

fn run(args: Args) -> Result<(), CliError> {
    let opts = load_options(&args)?;
    let text = read_input(args.input.as_deref())?;
    let mut graph = TopologyDocument::from_json(&text)
        .and_then(TopologyDocument::into_graph)
        .map_err(CliError::Document)?;

    match args.command {
        Command::Validate => {
            let compounds = graph.nodes().filter(|v| graph.has_children(v)).count();
            write_json(
                &ValidateOut {
                    nodes: graph.node_count(),
                    edges: graph.edge_count(),
                    compounds,
                    components: narwhal::graph::alg::components(&graph).len(),
                },
                args.pretty,
            )
        }
        Command::Layout => {
            let result = block_on(narwhal::layout(
                &mut graph,
                args.algorithm,
                &StyleSizeHints::default(),
                &opts,
                &CancelToken::new(),
            ))?;
            if args.absolute {
                let abs = result.resolve_absolute();
                write_json(
                    &AbsoluteOut {
                        positions: &abs.positions,
                    },
                    args.pretty,
                )
            } else {
                write_json(
                    &LayoutOut {
                        positions: &result.positions,
                    },
                    args.pretty,
                )
            }
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Document(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
