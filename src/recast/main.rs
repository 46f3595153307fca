use clap::Parser;
use recast::column::{Column, ColumnList};
use recast::config::TableConfig;
use recast::error::{RecastError, Result};
use recast::extractor::Extractor;
use recast::iter::CastableIterator;
use recast::map::Map;
use recast::source::Source;
use recast::table::{RequestContext, Table};
use recast::value::Value;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::Read;
use std::path::PathBuf;

mod args;
mod cli;
use args::{Cli, Commands, ExtractArgs, InputArgs};
use cli::print::{print_pairs, print_table, print_value};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        let _ = TermLogger::init(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    }

    let config_dir = cli
        .config
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let config = TableConfig::load(&config_dir)?;

    match cli.command {
        Commands::Map { input, extract } => handle_map(&input, &extract),
        Commands::Get {
            input,
            extract,
            lookup,
        } => handle_get(&input, &extract, &lookup),
        Commands::Count { input } => handle_count(&input),
        Commands::Table {
            input,
            columns,
            sort,
            path,
            query,
            item_class,
        } => handle_table(
            &config,
            &input,
            &columns,
            &sort,
            path.as_deref(),
            &query,
            item_class,
        ),
    }
}

fn load_source(input: &InputArgs) -> Result<Source> {
    let content = if input.input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&input.input)?
    };
    let json: serde_json::Value = serde_json::from_str(&content)?;
    log::debug!("loaded input from {}", input.input);
    Source::try_from(Value::from(json))
}

fn extractor(extract: &ExtractArgs) -> Extractor {
    Extractor::new(&extract.key, &extract.value)
}

fn handle_map(input: &InputArgs, extract: &ExtractArgs) -> Result<()> {
    let mut iter = CastableIterator::new(load_source(input)?, Some(extractor(extract).into()))?;
    let pairs: Vec<(Value, Value)> = iter.pairs().collect::<Result<_>>()?;
    print_pairs(&pairs);
    Ok(())
}

fn handle_get(input: &InputArgs, extract: &ExtractArgs, lookup: &str) -> Result<()> {
    let map = Map::new(load_source(input)?, extractor(extract))?;
    let value = map.get(&Value::from(lookup))?;
    print_value(&value);
    Ok(())
}

fn handle_count(input: &InputArgs) -> Result<()> {
    let map = Map::new(load_source(input)?, Extractor::default())?;
    println!("{}", map.count()?);
    Ok(())
}

fn parse_column(raw: &str) -> Column {
    match raw.split_once('=') {
        Some((accessor, title)) => Column::new(accessor).with_title(title),
        None => Column::new(raw),
    }
}

fn handle_table(
    config: &TableConfig,
    input: &InputArgs,
    columns: &[String],
    sort: &[String],
    path: Option<&str>,
    query: &str,
    item_class: Option<String>,
) -> Result<()> {
    let list = ColumnList::new();
    for raw in columns {
        list.append(parse_column(raw));
    }

    let table = Table::new(load_source(input)?)
        .with_columns(list)
        .with_config(config);

    for raw in sort {
        let (name, direction) = raw.split_once(':').ok_or_else(|| {
            RecastError::InvalidConfiguration(format!(
                "sort '{}' must look like column:direction",
                raw
            ))
        })?;
        table.add_sort_column(name, direction);
    }
    if let Some(path) = path {
        let uri = if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        };
        table.set_request(Some(RequestContext::parse(&uri)));
    }
    if let Some(class) = item_class {
        table.set_item_class(class);
    }

    print_table(&table)
}
