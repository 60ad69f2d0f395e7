// ==========================================
// 裁缝店业务管理系统 - 命令行入口
// ==========================================
// 职责: 上传/下载协作方，驱动导入、导出、模板与驾驶舱
// ==========================================

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tailor_shop::app::{get_default_db_path, AppState};
use tailor_shop::logging::{self, LogFormat};
use tailor_shop::{EntityKind, TabularFormat};

#[derive(Parser)]
#[command(name = "tailor-shop")]
#[command(about = "Import and export tailor shop records as CSV or Excel")]
#[command(long_about = "Import and export tailor shop records as CSV or Excel.

KINDS:
  customers, inventory, orders, requirements, payments, suppliers, purchases

EXAMPLES:
  tailor-shop import customers customers.csv
  tailor-shop import orders orders.xlsx --no-header
  tailor-shop export inventory inventory.xlsx --columns id,item_name,stock_quantity
  tailor-shop template orders sample_orders.csv
  tailor-shop dashboard")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database (defaults to the user data directory)
    #[arg(long, global = true, env = "TAILOR_SHOP_DB_PATH")]
    db: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import records from a CSV or XLSX file
    Import {
        /// Entity kind
        kind: EntityKind,

        /// File to import (.csv / .xlsx)
        file: PathBuf,

        /// Treat the first row as data rather than a header
        #[arg(long)]
        no_header: bool,

        /// Declared text encoding (only UTF-8 is supported)
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Export records to a CSV or XLSX file
    Export {
        /// Entity kind
        kind: EntityKind,

        /// Output file; the extension selects the format
        out: PathBuf,

        /// Column keys to include, comma-separated (default: all)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Only export records matching this search
        #[arg(long)]
        query: Option<String>,
    },

    /// Write a sample import template
    Template {
        /// Entity kind
        kind: EntityKind,

        /// Output file
        out: PathBuf,
    },

    /// Print dashboard summary and analytics as JSON
    Dashboard,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_with(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });

    let db_path = match cli.db {
        Some(path) => path.to_string_lossy().to_string(),
        None => get_default_db_path(),
    };
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Import {
            kind,
            file,
            no_header,
            encoding,
        } => {
            let response = state
                .import_api
                .import_file(kind, &file, encoding.as_deref(), !no_header)
                .with_context(|| format!("无法导入 {}", file.display()))?;
            println!("{}", response.message);
        }
        Commands::Export {
            kind,
            out,
            columns,
            query,
        } => {
            let format = format_for(&out)?;
            let exported = state
                .export_api
                .export(kind, &columns, query.as_deref(), format)?;
            std::fs::write(&out, &exported.bytes)
                .with_context(|| format!("无法写入 {}", out.display()))?;
            println!("Exported {} to {}", kind.plural_label(), out.display());
        }
        Commands::Template { kind, out } => {
            let template = state.export_api.template(kind)?;
            std::fs::write(&out, &template.bytes)
                .with_context(|| format!("无法写入 {}", out.display()))?;
            println!("Wrote {} to {}", template.filename, out.display());
        }
        Commands::Dashboard => {
            let report = serde_json::json!({
                "summary": state.dashboard_api.summary()?,
                "analytics": state.dashboard_api.analytics()?,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// 按输出文件扩展名选择格式
fn format_for(path: &Path) -> Result<TabularFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    TabularFormat::from_extension(ext)
        .ok_or_else(|| anyhow!("unsupported output format: {}", path.display()))
}
