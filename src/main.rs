use clap::{Parser, Subcommand};
use doc_tasks::{config, flatten, output, tasks};
use std::path::{Path, PathBuf};
use std::process::{ExitCode, Stdio};

/// Arguments forwarded verbatim to the external tool.
#[derive(clap::Args, Clone)]
struct PassThrough {
    /// Extra arguments appended to the configured command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(clap::Args, Clone)]
struct AssistArgs {
    /// Generated site to read pages from [default: paths.site]
    #[arg(long)]
    source: Option<PathBuf>,

    /// Flat folder to fill with pages [default: paths.assistant]
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Copy the existing site without rebuilding it first
    #[arg(long)]
    skip_build: bool,

    /// Print the copy report as JSON instead of one line per page
    #[arg(long)]
    json: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup; called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "doc-tasks")]
#[command(about = "Task runner for a documentation site")]
#[command(long_about = "\
Task runner for a documentation site

Wraps the dependency manager and the documentation generator (Poetry and
MkDocs by default) and flattens the built site for an assistant.

Tasks:

  clean       remove the built site and caches (paths.clean)
  reset       clean, then install
  install     poetry install
  build       poetry run mkdocs build
  serve       poetry run mkdocs serve
  deploy      poetry run mkdocs gh-deploy
  assist      build, then copy every page into one flat folder:
                site/index.html        → assistant/index.html
                site/guide/intro.html  → assistant/guide - intro.html

Arguments after a pass-through task are handed to the tool unchanged:

  doc-tasks serve --dev-addr 0.0.0.0:8000

A failing tool's exit code becomes doc-tasks' exit code.

Run 'doc-tasks gen-config' to generate a documented doc-tasks.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root: working directory for tools, base for configured paths
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file [default: <root>/doc-tasks.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove the generated site and caches
    Clean,
    /// Clean, then reinstall dependencies
    Reset,
    /// Install declared dependencies
    Install(PassThrough),
    /// Generate the documentation site
    Build(PassThrough),
    /// Run a local preview server
    Serve(PassThrough),
    /// Publish the generated site
    Deploy(PassThrough),
    /// Build, then flatten every generated page into the assistant folder
    Assist(AssistArgs),
    /// Print a stock doc-tasks.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let code = err
                .downcast_ref::<tasks::TaskError>()
                .map(tasks::TaskError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // gen-config must work even when the existing config is broken.
    let config = match (&cli.command, &cli.config) {
        (Command::GenConfig, _) => config::TaskConfig::default(),
        (_, Some(path)) => config::load_config_file(path)?,
        (_, None) => config::load_config(&cli.root)?,
    };
    let root = cli.root.as_path();
    let commands = &config.commands;

    match cli.command {
        Command::Clean => clean(root, &config)?,
        Command::Reset => {
            clean(root, &config)?;
            pass_through("install", &commands.install, &[], root)?;
        }
        Command::Install(pt) => pass_through("install", &commands.install, &pt.args, root)?,
        Command::Build(pt) => pass_through("build", &commands.build, &pt.args, root)?,
        Command::Serve(pt) => pass_through("serve", &commands.serve, &pt.args, root)?,
        Command::Deploy(pt) => pass_through("deploy", &commands.deploy, &pt.args, root)?,
        Command::Assist(args) => {
            if !args.skip_build {
                if args.json {
                    // stdout carries only the JSON report
                    output::eprint_banner("build", &tasks::command_line(&commands.build, &[]));
                    tasks::run_with_stdout(
                        &commands.build,
                        &[],
                        root,
                        Stdio::from(std::io::stderr()),
                    )?;
                } else {
                    pass_through("build", &commands.build, &[], root)?;
                }
            }
            let source = args
                .source
                .unwrap_or_else(|| root.join(&config.paths.site));
            let destination = args
                .destination
                .unwrap_or_else(|| root.join(&config.paths.assistant));
            assist(&source, &destination, args.json)?;
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn clean(root: &Path, config: &config::TaskConfig) -> Result<(), tasks::TaskError> {
    output::print_banner("clean", &config.paths.clean.join(" "));
    let report = tasks::clean(root, &config.paths.clean)?;
    output::print_clean_output(&report, root);
    Ok(())
}

fn pass_through(
    task: &str,
    argv: &[String],
    extra_args: &[String],
    root: &Path,
) -> Result<(), tasks::TaskError> {
    output::print_banner(task, &tasks::command_line(argv, extra_args));
    tasks::run(argv, extra_args, root)
}

/// Flatten `source` into `destination`, creating the destination if needed.
fn assist(source: &Path, destination: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Checked here too so a missing site never leaves a fresh empty folder behind.
    if !source.is_dir() {
        return Err(flatten::FlattenError::SourceNotFound(source.to_path_buf()).into());
    }
    flatten::check_disjoint(source, destination)?;
    std::fs::create_dir_all(destination)?;

    if json {
        let report = flatten::flatten(source, destination)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::print_banner(
        "assist",
        &format!("{} \u{2192} {}", source.display(), destination.display()),
    );
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_flatten_event(&event));
        }
    });
    let result = flatten::flatten_with_events(source, destination, Some(tx));
    printer.join().ok();
    let report = result?;
    output::print_flatten_summary(&report);
    Ok(())
}
