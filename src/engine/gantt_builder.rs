// ==========================================
// 工序计划甘特图 - 甘特图数据构建引擎
// ==========================================
// 职责: OperationPlan 列表 → 资源分组 + 预约条 + 初始定位日期
// 输入: 规范化后的工序计划 + 视图配置
// 输出: GanttDataset
// ==========================================

use crate::config::GanttViewConfig;
use crate::domain::gantt::{Appointment, GanttDataset, GanttResource};
use crate::domain::operation_plan::OperationPlan;
use crate::engine::inventory_status::InventoryStatusClassifier;
use crate::importer::file_parser::PlanningResponse;
use crate::importer::row_normalizer::RowNormalizer;
use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

// ==========================================
// GanttBuilder - 甘特图数据构建器
// ==========================================
pub struct GanttBuilder {
    config: GanttViewConfig,
    classifier: InventoryStatusClassifier,
}

impl GanttBuilder {
    pub fn new(config: GanttViewConfig, classifier: InventoryStatusClassifier) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &GanttViewConfig {
        &self.config
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 从数据源响应构建（规范化 + 构建）
    #[instrument(skip(self, response), fields(rows = response.rows.len()))]
    pub fn build_from_response(
        &self,
        response: &PlanningResponse,
        now: NaiveDateTime,
    ) -> GanttDataset {
        let (plans, skipped) = RowNormalizer::new().normalize_all(&response.rows);
        let mut dataset = self.build(plans, response.total_records(), now);
        dataset.skipped_rows = skipped;
        dataset
    }

    /// 构建甘特图数据集
    ///
    /// # 规则
    /// 1. 资源去重后按名称排序，id 依次为 1..=n
    /// 2. 每条工序计划生成一个预约条，附带库存状态分类结果
    /// 3. 初始定位日期 = 截止日之后最早的开始时间，无则取 now
    #[instrument(skip(self, plans), fields(count = plans.len()))]
    pub fn build(
        &self,
        plans: Vec<OperationPlan>,
        total_records: usize,
        now: NaiveDateTime,
    ) -> GanttDataset {
        let resources = self.build_resources(&plans);
        let ids: HashMap<&str, u32> = resources.iter().map(|r| (r.text.as_str(), r.id)).collect();

        let appointments: Vec<Appointment> = plans
            .iter()
            .map(|plan| {
                // 资源列表由同一批 plans 生成，必然存在
                let resource_id = ids.get(plan.resource.as_str()).copied().unwrap_or_default();
                self.build_appointment(plan, resource_id)
            })
            .collect();

        let current_date = self.initial_date(&appointments, now);

        info!(
            resources = resources.len(),
            appointments = appointments.len(),
            %current_date,
            "甘特图数据构建完成"
        );

        GanttDataset {
            resources,
            appointments,
            current_date,
            total_records,
            skipped_rows: 0,
        }
    }

    /// 资源分组（去重、排序、分配 id）
    pub fn build_resources(&self, plans: &[OperationPlan]) -> Vec<GanttResource> {
        let names: BTreeSet<&str> = plans.iter().map(|p| p.resource.as_str()).collect();
        names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| GanttResource {
                id: idx as u32 + 1,
                text: name.to_string(),
                color: self.config.resource_color.clone(),
            })
            .collect()
    }

    fn build_appointment(&self, plan: &OperationPlan, resource_id: u32) -> Appointment {
        Appointment {
            text: plan.operation.clone(),
            start: plan.start,
            end: plan.end,
            resource_id,
            resource: plan.resource.clone(),
            item: plan.item.clone(),
            quantity: plan.quantity,
            delay: plan.delay(),
            status: plan.status.clone(),
            reference: plan.reference.clone(),
            inventory_status: self.classifier.classify_plan(plan),
            fill_color: self.config.appointment_color.clone(),
            highlighted: false,
            border: false,
            plan: plan.clone(),
        }
    }

    /// 初始定位日期
    pub fn initial_date(&self, appointments: &[Appointment], now: NaiveDateTime) -> NaiveDateTime {
        let cutoff = self.config.view_cutoff.and_hms_opt(0, 0, 0).unwrap_or_default();
        appointments
            .iter()
            .map(|a| a.start)
            .filter(|start| *start >= cutoff)
            .min()
            .unwrap_or(now)
    }
}
