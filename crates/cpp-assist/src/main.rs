use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tower_lsp::{LspService, Server};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cpp_assist::symbols::{WorkspaceScanOptions, scan_workspace};
use cpp_assist::{AssistLanguageServer, AstPath, QuickFixRegistry, SourceLocation, SymbolProvider, SyntaxTree};

#[derive(Parser, Debug)]
#[command(name = "cpp-assist", version, about)]
struct Args {
    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the language server over stdio (default).
    Serve,
    /// Print the syntax tree of a file.
    Tree { file: PathBuf },
    /// Print the AST path enclosing a position.
    Path {
        file: PathBuf,
        #[arg(long, conflicts_with_all = ["line", "column"])]
        offset: Option<u32>,
        /// 1-based line.
        #[arg(long, requires = "column")]
        line: Option<u32>,
        /// 1-based UTF-16 column.
        #[arg(long, requires = "line")]
        column: Option<u32>,
    },
    /// Index a directory and list the declarations matching a query.
    Symbols {
        root: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

#[derive(Debug)]
enum CliError {
    Read { path: PathBuf, source: std::io::Error },
    MissingPosition,
    InvalidPosition { path: PathBuf },
}

impl fmt::Display for CliError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::MissingPosition => write!(f, "pass either --offset or --line with --column"),
            Self::InvalidPosition { path } => {
                write!(f, "position is outside of {}", path.display())
            },
        }
    }
}

impl std::error::Error for CliError {}

fn init_logging(args: &Args) {
    let filter = || {
        if args.verbose {
            EnvFilter::new("cpp_assist=debug,tower_lsp=debug")
        } else {
            EnvFilter::new("cpp_assist=info,tower_lsp=warn")
        }
    };

    let file_layer = args.log_file.as_ref().map(|log_path| {
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("cpp-assist.log")),
        );
        log_fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(false)
            .with_filter(filter())
    });

    let stderr_layer = log_fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn print_tree(file: &Path) -> Result<(), CliError> {
    let tree = SyntaxTree::parse(&read_source(file)?);
    print!("{:#?}", tree.root());
    Ok(())
}

fn print_path(
    file: &Path,
    offset: Option<u32>,
    line: Option<u32>,
    column: Option<u32>,
) -> Result<(), CliError> {
    let source = read_source(file)?;
    let display_path = file.to_string_lossy();
    let location = match (offset, line, column) {
        (Some(offset), _, _) => SourceLocation::from_offset(&display_path, &source, offset.into()),
        (None, Some(line), Some(column)) => {
            SourceLocation::from_line_column(&display_path, &source, line, column)
        },
        _ => return Err(CliError::MissingPosition),
    }
    .ok_or_else(|| CliError::InvalidPosition {
        path: file.to_path_buf(),
    })?;

    let tree = SyntaxTree::parse(&source);
    let path = AstPath::resolve(&tree, location.offset());
    println!("{location}");
    if path.is_empty() {
        println!("(no enclosing construct)");
    }
    for (depth, node) in path.iter().enumerate() {
        println!("{:indent$}{:?} {:?}", "", node.kind(), node.text_range(), indent = depth * 2);
    }
    Ok(())
}

fn print_symbols(
    root: PathBuf,
    query: &str,
    limit: usize,
) {
    let provider = SymbolProvider::new();
    let summary = scan_workspace(&provider, &[root], &WorkspaceScanOptions::default());
    let snapshot = provider.snapshot();
    for (name, location) in snapshot.search(query, limit) {
        let qualified = match &location.container {
            Some(container) => format!("{container}::{name}"),
            None => name.to_string(),
        };
        println!("{:<10} {qualified}  {}", location.kind.as_str(), location.uri.path());
    }
    info!("{} file(s) indexed, {} skipped", summary.indexed, summary.skipped);
}

/// Runs the stdio server. Embedders supply factories through their own registry; this one is empty.
async fn serve() {
    info!("Starting cpp-assist server v{}", env!("CARGO_PKG_VERSION"));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let registry = Arc::new(QuickFixRegistry::new());
    let (service, socket) =
        LspService::new(move |client| AssistLanguageServer::new(client, Arc::clone(&registry)));

    Server::new(stdin, stdout, socket).serve(service).await;

    info!("cpp-assist server stopped");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve().await;
            Ok(())
        },
        Command::Tree { file } => print_tree(&file),
        Command::Path {
            file,
            offset,
            line,
            column,
        } => print_path(&file, offset, line, column),
        Command::Symbols { root, query, limit } => {
            print_symbols(root, &query, limit);
            Ok(())
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        },
    }
}
