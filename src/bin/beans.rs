//! CLI wrapper for the beans interpreter.
//!
//! Usage:
//!   beans <file>                # Execute a script
//!   beans -e "code"             # Evaluate code
//!   beans -p <file>             # Print the AST without evaluating
//!   beans -l <file>             # Print the token tree without building an AST
//!   beans -i                    # Start REPL (interactive mode)

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use beans::parser::ast::Node;
use beans::parser::{parse_to_ast, parse_to_token_tree};
use beans::runner::ds::Value;
use beans::runner::{Runtime, RuntimeConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Run,
    Eval,
    Parse,
    Tokenize,
    Repl,
    Help,
}

struct CliArgs {
    mode: Mode,
    input: Option<String>,
    config: Option<PathBuf>,
    verbose: u8,
}

fn main() {
    let args = match parse_args(env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    setup_logging(args.verbose);

    match args.mode {
        Mode::Help => print_usage(),
        Mode::Repl => run_repl(load_config(&args)),
        Mode::Eval => eval_code(&input_of(&args), load_config(&args)),
        Mode::Run => run_file(&input_of(&args), load_config(&args)),
        Mode::Parse => {
            let source = read_source(&input_of(&args));
            match parse_to_ast(&source) {
                Ok(ast) => println!("{:#?}", ast),
                Err(e) => fail(&e.to_string()),
            }
        }
        Mode::Tokenize => {
            let source = read_source(&input_of(&args));
            match parse_to_token_tree(&source) {
                Ok(tree) => println!("{}", tree),
                Err(e) => fail(&e.to_string()),
            }
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        mode: Mode::Run,
        input: None,
        config: None,
        verbose: 0,
    };
    if args.is_empty() {
        cli.mode = Mode::Help;
        return Ok(cli);
    }

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => cli.mode = Mode::Help,
            "-p" | "--parse" => cli.mode = Mode::Parse,
            "-l" | "--tokenize" => cli.mode = Mode::Tokenize,
            "-i" | "--stdin" => cli.mode = Mode::Repl,
            "-v" => cli.verbose = cli.verbose.max(1),
            "-vv" => cli.verbose = 2,
            "-e" | "--eval" => {
                cli.mode = Mode::Eval;
                cli.input = Some(iter.next().ok_or("-e expects code to evaluate")?);
            }
            "--config" => {
                let path = iter.next().ok_or("--config expects a path")?;
                cli.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option `{}`", flag)),
            path => {
                if cli.input.is_some() {
                    return Err(format!("unexpected argument `{}`", path));
                }
                cli.input = Some(path.to_string());
            }
        }
    }

    let needs_input = matches!(cli.mode, Mode::Run | Mode::Parse | Mode::Tokenize);
    if needs_input && cli.input.is_none() {
        return Err("expected a path to a script".to_string());
    }
    Ok(cli)
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_env("BEANS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry().with(formatter).with(filter).init();
}

fn print_usage() {
    eprintln!("beans - yield-block scripting language");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  beans <file>                Execute a script");
    eprintln!("  beans -e, --eval \"code\"     Evaluate code");
    eprintln!("  beans -p, --parse <file>    Print the AST without evaluating it");
    eprintln!("  beans -l, --tokenize <file> Print the token tree without building an AST");
    eprintln!("  beans -i, --stdin           Start REPL (interactive mode)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>             Load runtime limits from a config file");
    eprintln!("  -v, -vv                     Log debug or trace events to stderr");
    eprintln!("  -h, --help                  Print this message and exit");
}

fn fail(message: &str) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn input_of(args: &CliArgs) -> String {
    args.input.clone().unwrap_or_default()
}

fn load_config(args: &CliArgs) -> RuntimeConfig {
    match &args.config {
        Some(path) => match RuntimeConfig::load(path) {
            Ok(config) => config,
            Err(e) => fail(&format!("{}: {}", path.display(), e)),
        },
        None => RuntimeConfig::default(),
    }
}

fn read_source(filename: &str) -> String {
    match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => fail(&format!("Error reading file '{}': {}", filename, e)),
    }
}

/// Run each top-level statement, returning the value of the last one.
fn evaluate(rt: &mut Runtime, source: &str) -> Result<Option<Value>, String> {
    let ast = parse_to_ast(source).map_err(|e| e.to_string())?;
    let statements = match ast {
        Node::Program(body) => body,
        other => vec![other],
    };

    let ctx = rt.root_context();
    let mut last_value = None;
    for statement in &statements {
        last_value = rt.execute(statement, &ctx).map_err(|e| e.to_string())?;
    }
    Ok(last_value)
}

fn run_file(filename: &str, config: RuntimeConfig) {
    let source = read_source(filename);
    let mut rt = Runtime::with_config(config);
    // `need "./x"` in the script resolves next to the script itself.
    if let Some(dir) = Path::new(filename).parent() {
        rt.modules_mut().set_base_dir(dir);
    }
    if let Err(message) = evaluate(&mut rt, &source) {
        fail(&message);
    }
}

fn eval_code(code: &str, config: RuntimeConfig) {
    let mut rt = Runtime::with_config(config);
    match evaluate(&mut rt, code) {
        Ok(Some(value)) => println!("{}", value),
        Ok(None) => {}
        Err(message) => fail(&message),
    }
}

fn run_repl(config: RuntimeConfig) {
    println!("beans v{}", env!("CARGO_PKG_VERSION"));
    println!("Type code and press Enter. Type .exit to quit.");
    println!();

    let mut rt = Runtime::with_config(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }

        let input = input.trim();
        if input == ".exit" || input == ".quit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        // Definitions persist across lines; errors only abort the current one.
        match evaluate(&mut rt, input) {
            Ok(Some(value)) => println!("{}", value),
            Ok(None) => {}
            Err(message) => eprintln!("error: {}", message),
        }
    }

    println!("Goodbye!");
}
