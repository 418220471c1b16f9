//! # Paginator CLI
//!
//! Usage:
//!   paginator paginate page.html > chunks.json
//!   paginator paginate page.html --title "Scope of Work" > page.html
//!   paginator render proposal.json -o proposal.html
//!   paginator render proposal.json --manifest > frames.json
//!   paginator example > proposal.json
//!
//! Set `RUST_LOG=debug` to see every page-break decision.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use paginator::model::proposal::{ContentPage, ContentPageType};
use paginator::{PaginatorConfig, PaginatorError, ProposalRenderer, TextMetricsMeasurer};

#[derive(Parser)]
#[command(name = "paginator", version, about = "Split proposal pages into printable A4 frames")]
struct Cli {
    /// JSON configuration file (frame geometry, typography, break policy)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Paginate one page of HTML and print the chunks as JSON
    Paginate(PaginateArgs),

    /// Render a whole proposal document
    Render(RenderArgs),

    /// Print a sample proposal as JSON
    Example,
}

#[derive(clap::Args)]
struct PaginateArgs {
    /// HTML file, or `-` for stdin
    file: String,

    /// Frame the chunks under this header title and print HTML instead of JSON
    #[arg(short, long)]
    title: Option<String>,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Proposal JSON file, or `-` for stdin
    file: String,

    /// Write the output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the JSON frame manifest instead of the HTML document
    #[arg(long)]
    manifest: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PaginatorError> {
    let config = match &cli.config {
        Some(path) => PaginatorConfig::load(path)?,
        None => PaginatorConfig::default(),
    };

    match cli.command {
        Command::Example => {
            print!("{}", example_proposal_json());
            Ok(())
        }
        Command::Paginate(args) => {
            let html = read_input(&args.file)?;
            match args.title {
                None => {
                    let pagination = paginator::paginate_markup(&html, &config)?;
                    println!("{}", serde_json::to_string_pretty(&pagination)?);
                }
                Some(title) => {
                    let page = ContentPage {
                        id: "page".to_string(),
                        page_type: ContentPageType::Text,
                        title,
                        content: html,
                        is_visible: true,
                        order: 0,
                    };
                    let measurer = TextMetricsMeasurer::new(config.prose.clone());
                    let doc = ProposalRenderer::new(&config, &measurer).render_page(&page);
                    print!("{}", doc.to_html());
                }
            }
            Ok(())
        }
        Command::Render(args) => {
            let json = read_input(&args.file)?;
            let doc = paginator::render_proposal_json(&json, &config)?;
            let out = if args.manifest {
                doc.to_json()?
            } else {
                doc.to_html()
            };
            match &args.output {
                Some(path) => {
                    write_output(path, &out)?;
                    eprintln!("✓ Written {} pages to {}", doc.total_pages(), path.display());
                }
                None => print!("{}", out),
            }
            Ok(())
        }
    }
}

fn read_input(file: &str) -> Result<String, PaginatorError> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| PaginatorError::Io {
                path: "<stdin>".to_string(),
                source,
            })?;
        return Ok(buf);
    }
    fs::read_to_string(file).map_err(|source| PaginatorError::Io {
        path: file.to_string(),
        source,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), PaginatorError> {
    fs::write(path, contents).map_err(|source| PaginatorError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn example_proposal_json() -> &'static str {
    r##"{
  "id": "example-001",
  "prepared_for": "Acme Logistics",
  "prepared_by": "Northwind Studio",
  "project_type": "Web Platform",
  "date": "2026-10-19",
  "language": "en",
  "include_showcase": false,
  "pages": [
    {
      "id": "intro",
      "type": "text",
      "title": "Introduction",
      "order": 0,
      "content": "<h1>About this proposal</h1><p>This document describes the scope, timeline and investment for the new customer portal.</p><p>Every section below can be edited before the proposal is sent.</p>"
    },
    {
      "id": "scope",
      "type": "requirements",
      "title": "Scope of Work",
      "order": 1,
      "content": "<h2>Deliverables</h2><ol><li>Discovery workshops with the operations team</li><li>Information architecture and wireframes</li><li>Visual design for desktop and mobile</li><li>Front-end implementation</li><li>Integration with the shipment tracking API</li><li>Content migration</li><li>Accessibility review</li><li>Load testing</li><li>Launch support</li><li>Thirty days of warranty fixes</li></ol><h2>Out of scope</h2><p>Native mobile applications and changes to the warehouse system.</p>"
    },
    {
      "id": "investment",
      "type": "investment",
      "title": "Investment",
      "order": 2,
      "content": "<h2>Budget</h2><table><thead><tr><th>Phase</th><th>Duration</th><th>Cost</th></tr></thead><tbody><tr><td>Discovery</td><td>2 weeks</td><td>$8,000</td></tr><tr><td>Design</td><td>4 weeks</td><td>$16,000</td></tr><tr><td>Build</td><td>8 weeks</td><td>$42,000</td></tr><tr><td>Launch</td><td>2 weeks</td><td>$6,000</td></tr></tbody></table><p>Prices exclude VAT.</p>"
    },
    {
      "id": "process",
      "type": "process",
      "title": "Our Process",
      "order": 3,
      "content": "<div class=\"steps\"><div>Discover</div><div>Design</div><div>Build</div><div>Launch</div></div>"
    },
    {
      "id": "notes",
      "type": "notes",
      "title": "ملاحظات",
      "order": 4,
      "content": "<p>تسري هذه الأسعار لمدة ثلاثين يوما من تاريخ العرض.</p>"
    }
  ]
}
"##
}
