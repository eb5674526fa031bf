use anyhow::{bail, Context};
use colored::Colorize;
use regmirror_client::{
    ClientConfig, Collection, Record, RegisterClient, RegisterClientManager,
};
use regmirror_types::ItemHash;
use serde_json::{json, Value};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let register = match (&cli.register, &cli.url) {
        (Some(register), _) => register.clone(),
        (None, Some(_)) => "custom".to_string(),
        (None, None) => bail!("either --register or --url is required"),
    };

    let manager = RegisterClientManager::new(config);
    let shared = manager
        .register(&register, &cli.environment)
        .await
        .with_context(|| format!("failed to mirror register {register}"))?;
    let mut client = shared.write().await;
    let out = Output { format: cli.format };

    match cli.command {
        Command::Records(args) => cmd_records(&client, &out, args),
        Command::Record(args) => cmd_record(&client, &out, args),
        Command::History(args) => cmd_history(&client, &out, args),
        Command::Entries(args) => cmd_entries(&client, &out, args),
        Command::Item(args) => cmd_item(&client, &out, args),
        Command::Fields => cmd_fields(&client, &out),
        Command::Register => out.optional_record("register definition", client.register_definition()),
        Command::Custodian => out.optional_record("custodian", client.custodian()),
        Command::Verify => cmd_verify(&mut client, &out).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(page_size) = cli.page_size {
        if page_size == 0 {
            bail!("--page-size must be at least 1");
        }
        config.page_size = page_size;
    }
    if let Some(url) = &cli.url {
        config.base_url = Some(url.clone());
    }
    Ok(config)
}

fn cmd_records(client: &RegisterClient, out: &Output, args: RecordsArgs) -> anyhow::Result<()> {
    let mut records = if args.current {
        client.current_records()
    } else if args.expired {
        client.expired_records()
    } else {
        client.records()
    };
    if let Some(text) = &args.filter {
        records = records.filter_text(text)?;
    }

    let views = records.iter().map(record_json).collect::<anyhow::Result<Vec<_>>>()?;
    let page = Collection::new(views, records.page_size()).paginate(args.page);

    match out.format {
        OutputFormat::Json => out.json(&page),
        OutputFormat::Text => {
            for record in records.page(args.page) {
                print_record_line(record)?;
            }
            println!(
                "{}",
                format!(
                    "page {} of {} ({} records)",
                    page.page, page.total_pages, page.total_results
                )
                .dimmed()
            );
            Ok(())
        }
    }
}

fn cmd_record(client: &RegisterClient, out: &Output, args: KeyArgs) -> anyhow::Result<()> {
    out.optional_record(&format!("record {}", args.key), client.record(&args.key))
}

fn cmd_history(client: &RegisterClient, out: &Output, args: KeyArgs) -> anyhow::Result<()> {
    let history = client.records_with_history(0);
    let records = history.records_for_key(&args.key)?;
    match out.format {
        OutputFormat::Json => {
            let views = records.iter().map(record_json).collect::<anyhow::Result<Vec<_>>>()?;
            out.json(&views)
        }
        OutputFormat::Text => {
            for record in records {
                print_record_line(record)?;
            }
            Ok(())
        }
    }
}

fn cmd_entries(client: &RegisterClient, out: &Output, args: EntriesArgs) -> anyhow::Result<()> {
    let entries = client.entries(args.since);
    match out.format {
        OutputFormat::Json => {
            let views = entries
                .iter()
                .map(|e| {
                    json!({
                        "entry-number": e.entry_number(),
                        "key": e.key(),
                        "entry-timestamp": e.timestamp(),
                        "item-hash": e.item_hash(),
                    })
                })
                .collect();
            out.json(&Collection::new(views, entries.page_size()).paginate(args.page))
        }
        OutputFormat::Text => {
            for entry in entries.page(args.page) {
                println!(
                    "{:>6}  {}  {}  {}",
                    entry.entry_number().to_string().yellow(),
                    entry.timestamp().dimmed(),
                    entry.key().bold(),
                    entry.item_hash().cyan()
                );
            }
            Ok(())
        }
    }
}

fn cmd_item(client: &RegisterClient, out: &Output, args: ItemArgs) -> anyhow::Result<()> {
    let hash = ItemHash::parse(&args.hash)?;
    let Some(item) = client.item(hash.as_str()) else {
        bail!("item {hash} not found");
    };
    let value = Value::Object(item.value()?.as_ref().clone());
    match out.format {
        OutputFormat::Json => out.json(&value),
        OutputFormat::Text => {
            println!("{}", item.hash().to_string().cyan());
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

fn cmd_fields(client: &RegisterClient, out: &Output) -> anyhow::Result<()> {
    let fields = client.field_definitions()?;
    match out.format {
        OutputFormat::Json => {
            let views = fields
                .iter()
                .map(|f| f.as_ref().map(record_json).transpose().map(|v| v.unwrap_or(Value::Null)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            out.json(&views)
        }
        OutputFormat::Text => {
            for field in fields.iter() {
                match field {
                    Some(record) => print_record_line(record)?,
                    None => println!("{}", "(missing field definition)".red()),
                }
            }
            Ok(())
        }
    }
}

async fn cmd_verify(client: &mut RegisterClient, out: &Output) -> anyhow::Result<()> {
    let report = client.refresh_data().await?;
    match out.format {
        OutputFormat::Json => out.json(&report),
        OutputFormat::Text => {
            println!("{} Register mirror verified", "✓".green().bold());
            println!(
                "  Root hash: {}",
                report.root_hash.as_deref().unwrap_or("(none)").cyan()
            );
            println!("  User entries: {}", report.latest_user_entry.to_string().bold());
            println!("  System entries: {}", report.latest_system_entry.to_string().bold());
            if !report.is_noop() {
                println!(
                    "  New: {} items, {} user entries, {} system entries",
                    report.items_added, report.user_entries_appended, report.system_entries_appended
                );
            }
            Ok(())
        }
    }
}

// ---- Rendering ----

struct Output {
    format: OutputFormat,
}

impl Output {
    fn json(&self, value: &impl serde::Serialize) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn optional_record(&self, what: &str, record: Option<Record>) -> anyhow::Result<()> {
        let Some(record) = record else {
            bail!("{what} not found");
        };
        match self.format {
            OutputFormat::Json => self.json(&record_json(&record)?),
            OutputFormat::Text => print_record_line(&record),
        }
    }
}

fn record_json(record: &Record) -> anyhow::Result<Value> {
    let entry = record.entry();
    let item = match record.item() {
        Some(item) => Value::Object(item.value()?.as_ref().clone()),
        None => Value::Null,
    };
    Ok(json!({
        "entry-number": entry.entry_number(),
        "key": entry.key(),
        "entry-timestamp": entry.timestamp(),
        "item-hash": entry.item_hash(),
        "item": item,
    }))
}

fn print_record_line(record: &Record) -> anyhow::Result<()> {
    let entry = record.entry();
    let value = match record.item() {
        Some(item) => serde_json::to_string(item.value()?.as_ref())?,
        None => "(item missing)".red().to_string(),
    };
    let key = if record.is_expired() {
        entry.key().dimmed()
    } else {
        entry.key().bold()
    };
    println!("{:>6}  {}  {}", entry.entry_number().to_string().yellow(), key, value);
    Ok(())
}
