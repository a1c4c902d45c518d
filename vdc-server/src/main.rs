//! VDC报表工具主程序
//!
//! 连接患者记录库，按日期区间生成明细/汇总收入报表并打印，
//! 含总计、25% 机构分成与净应收金额大写。

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use vdc_core::{HospitalDirectory, PatientStore, ScanCatalog};
use vdc_database::{DatabasePool, PostgresPatientStore};
use vdc_reporting::{
    build_report, format_amount, pad_names, scan_column_width, to_words, Report, ReportMode,
    ReportRows, SUMMARY_PLACEHOLDER,
};

/// VDC报表工具命令行参数
#[derive(Parser, Debug)]
#[command(name = "vdc-server")]
#[command(about = "VDC 诊断影像中心收入报表工具")]
struct Args {
    /// 数据库连接串（缺省时读配置文件的 database_url）
    #[arg(short, long)]
    database_url: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 区间起始日期 (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,

    /// 区间结束日期 (YYYY-MM-DD)，含当天
    #[arg(long)]
    to: NaiveDate,

    /// 汇总模式（按扫描组合折叠）；缺省为明细模式
    #[arg(long)]
    summary: bool,

    /// 扫描目录JSON文件 (id → 名称/收费/时长)
    #[arg(long)]
    catalog: Option<String>,

    /// 医院目录JSON文件 (id → 展示名)
    #[arg(long)]
    hospitals: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn resolve_database_url(args: &Args) -> anyhow::Result<String> {
    if let Some(url) = &args.database_url {
        return Ok(url.clone());
    }
    if let Some(path) = &args.config {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .context("failed to read config file")?;
        return settings
            .get_string("database_url")
            .context("config file has no database_url");
    }
    bail!("either --database-url or --config is required");
}

fn load_catalog(path: Option<&str>) -> anyhow::Result<ScanCatalog> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path))?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(ScanCatalog::new()),
    }
}

fn load_hospitals(path: Option<&str>) -> anyhow::Result<HospitalDirectory> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read hospital directory {}", path))?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(HospitalDirectory::new()),
    }
}

fn print_report(report: &Report, from: NaiveDate, to: NaiveDate) {
    println!("VDC DIAGNOSTIC CENTRE - REVENUE REPORT");
    println!(
        "Period: {} to {}    Bill No: {}",
        vdc_reporting::render::format_date(from),
        vdc_reporting::render::format_date(to),
        report.bill_label
    );
    println!();

    if report.is_empty() {
        // 空结果必须显式提示，不渲染空表壳
        println!("No data found for the selected period.");
        return;
    }

    match &report.rows {
        ReportRows::Summary(rows) => {
            let width = scan_column_width(rows.iter().map(|r| &r.scan_names));
            for row in rows {
                let cells = pad_names(&row.scan_names, width, SUMMARY_PLACEHOLDER);
                println!(
                    "{} | {} | {} | scans {} | patients {} | rate {} | amount {}",
                    row.hospital,
                    row.category.label(),
                    cells.join(" | "),
                    row.number_of_scans,
                    row.patient_count,
                    format_amount(row.rate),
                    format_amount(row.amount),
                );
            }
        }
        ReportRows::Detail(rows) => {
            let width =
                scan_column_width(rows.iter().flat_map(|r| r.patients.iter().map(|p| &p.scan_names)));
            for row in rows {
                println!("{} - {}", row.hospital, row.category.label());
                for patient in &row.patients {
                    let cells = pad_names(&patient.scan_names, width, "");
                    println!(
                        "  {} | {} | {} | {}",
                        patient.cro,
                        patient.patient_name,
                        cells.join(" | "),
                        format_amount(patient.amount),
                    );
                }
                println!(
                    "  subtotal: scans {} amount {}",
                    row.total_scans,
                    format_amount(row.total_amount)
                );
            }
        }
    }

    let totals = &report.totals;
    println!();
    println!(
        "GROSS: scans {} amount {}",
        totals.gross_scans,
        format_amount(totals.gross_amount)
    );
    println!(
        "FREE SHARE (25%): scans {} amount {}",
        format_amount(totals.free_share_scans),
        format_amount(totals.free_share_amount)
    );
    println!(
        "NET RECEIVABLE: scans {} amount {}",
        format_amount(totals.net_scans),
        format_amount(totals.net_amount)
    );
    println!("IN WORDS: {}", to_words(totals.net_amount).to_uppercase());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    let database_url = resolve_database_url(&args)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let hospitals = load_hospitals(args.hospitals.as_deref())?;

    info!("connecting to patient record store...");
    let pool = DatabasePool::connect(&database_url).await?;
    let store = PostgresPatientStore::new(&pool);
    store.create_tables().await?;

    info!(
        "building {} report for {} to {}",
        if args.summary { "summary" } else { "detail" },
        args.from,
        args.to
    );
    let records = store.list_by_range(args.from, args.to).await?;
    let mode = if args.summary {
        ReportMode::Summary
    } else {
        ReportMode::Detail
    };
    let report = build_report(&records, &catalog, &hospitals, mode, args.to);

    print_report(&report, args.from, args.to);
    Ok(())
}
