// ==========================================
// 工序计划甘特图 - 命令行入口
// ==========================================
// 用法:
//   opplan-gantt <source> [--db PATH] [--locale L] [--format json|gantt] [--export OUT.csv]
//
// source: 计划数据文件（.json/.csv/.xlsx），或 "db" 表示读取本地 SQLite 缓存
// ==========================================

use anyhow::{bail, Context, Result};
use opplan_gantt::db::default_db_path;
use opplan_gantt::i18n::{self, t_with_args};
use opplan_gantt::importer::{FilePlanningSource, PlanningSource, RepositoryPlanningSource};
use opplan_gantt::repository::OperationPlanRowRepository;
use opplan_gantt::{
    logging, AppointmentExporter, ConfigManager, GanttBuilder, InventoryStatusClassifier,
    ResponseFormat,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
struct CliArgs {
    source: String,
    db_path: String,
    locale: Option<String>,
    format: Option<String>,
    export: Option<PathBuf>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut source = None;
    let mut db_path = None;
    let mut locale = None;
    let mut format = None;
    let mut export = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(args.next().context("--db 需要参数")?),
            "--locale" => locale = Some(args.next().context("--locale 需要参数")?),
            "--format" => format = Some(args.next().context("--format 需要参数")?),
            "--export" => export = Some(PathBuf::from(args.next().context("--export 需要参数")?)),
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => {
                if source.replace(other.to_string()).is_some() {
                    bail!("只能指定一个数据源");
                }
            }
        }
    }

    Ok(CliArgs {
        source: source.context("缺少数据源参数 <source>")?,
        db_path: db_path.unwrap_or_else(default_db_path),
        locale,
        format,
        export,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = parse_args()?;
    if let Some(locale) = &args.locale {
        i18n::set_locale(locale);
    }

    tracing::info!("工序计划甘特图 v{}", opplan_gantt::VERSION);
    tracing::info!("使用数据库: {}", args.db_path);

    // 视图配置
    let config = ConfigManager::new(&args.db_path)
        .and_then(|m| m.get_view_config())
        .context("读取视图配置失败")?;

    let format = match args.format.as_deref() {
        None | Some("gantt") => config.gantt_format(),
        Some("json") => ResponseFormat::Json,
        Some(other) => bail!("未知响应格式: {}", other),
    };

    // 数据源
    let source: Box<dyn PlanningSource> = if args.source == "db" {
        let repo = OperationPlanRowRepository::new(&args.db_path)?;
        Box::new(RepositoryPlanningSource::new(Arc::new(repo)))
    } else {
        Box::new(FilePlanningSource::new(&args.source))
    };

    let response = match source.fetch(format).await {
        Ok(response) => response,
        Err(e) => bail!("读取数据源失败: {}: {}", source.describe(), e.localized_message()),
    };

    // 构建甘特图数据
    let builder = GanttBuilder::new(config, InventoryStatusClassifier::new());
    let dataset = builder.build_from_response(&response, chrono::Local::now().naive_local());

    println!(
        "{}",
        t_with_args(
            "gantt.summary",
            &[
                ("appointments", &dataset.appointments.len().to_string()),
                ("resources", &dataset.resources.len().to_string()),
                ("skipped", &dataset.skipped_rows.to_string()),
            ],
        )
    );
    println!("{}", i18n::t("gantt.resources_label"));
    for resource in &dataset.resources {
        println!("[{}] {}", resource.id, resource.text);
        for a in dataset.appointments_on(resource.id) {
            println!(
                "    {:<12} {:<30} {} → {}  {}",
                a.reference,
                a.text,
                a.start.format("%Y-%m-%d %H:%M"),
                a.end.format("%Y-%m-%d %H:%M"),
                a.inventory_status.label
            );
        }
    }

    if let Some(path) = &args.export {
        let count = AppointmentExporter::export_to_path(path, &dataset)
            .with_context(|| format!("导出失败: {}", path.display()))?;
        println!("exported {} rows to {}", count, path.display());
    }

    Ok(())
}
