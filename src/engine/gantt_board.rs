// ==========================================
// 工序计划甘特图 - 甘特图交互状态
// ==========================================
// 职责: 点击高亮 / 共享需求描边 / 禁止跨资源移动 / 重新加载后定位
// 状态: 由 GanttBoard 实例持有，不使用模块级全局变量
// ==========================================

use crate::domain::gantt::{Appointment, GanttDataset};
use crate::domain::operation_plan::OperationPlan;
use crate::engine::error::{BoardError, BoardResult};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

// ==========================================
// Selection - 点击结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub reference: String,
    pub scroll_to: NaiveDateTime, // 控件滚动目标
    pub highlighted: usize,       // 同 reference 的预约条数
    pub bordered: usize,          // 共享需求的预约条数
    pub plan: OperationPlan,      // 详情面板数据
}

// ==========================================
// GanttBoard - 甘特图交互状态
// ==========================================
#[derive(Debug, Clone)]
pub struct GanttBoard {
    dataset: GanttDataset,
    highlight_color: String,
    selected_reference: Option<String>,
}

impl GanttBoard {
    pub fn new(dataset: GanttDataset, highlight_color: impl Into<String>) -> Self {
        Self {
            dataset,
            highlight_color: highlight_color.into(),
            selected_reference: None,
        }
    }

    pub fn dataset(&self) -> &GanttDataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> GanttDataset {
        self.dataset
    }

    pub fn selected_reference(&self) -> Option<&str> {
        self.selected_reference.as_deref()
    }

    fn appointment(&self, index: usize) -> BoardResult<&Appointment> {
        self.dataset
            .appointments
            .get(index)
            .ok_or(BoardError::AppointmentNotFound(index))
    }

    // ==========================================
    // 点击
    // ==========================================

    /// 点击预约条
    ///
    /// # 规则
    /// 1. 与被点击预约条 reference 相同的全部高亮，其余取消高亮
    /// 2. 与被点击预约条共享至少一个需求的全部描边，其余取消描边
    /// 3. 返回滚动目标与详情数据
    pub fn select(&mut self, index: usize) -> BoardResult<Selection> {
        let selected = self.appointment(index)?.clone();

        let mut highlighted = 0;
        let mut bordered = 0;
        for a in self.dataset.appointments.iter_mut() {
            a.highlighted = a.reference == selected.reference;
            a.border = a.plan.shares_demand_with(&selected.plan);
            highlighted += a.highlighted as usize;
            bordered += a.border as usize;
        }

        self.selected_reference = Some(selected.reference.clone());
        debug!(
            reference = %selected.reference,
            highlighted,
            bordered,
            "预约条已选中"
        );

        Ok(Selection {
            index,
            reference: selected.reference,
            scroll_to: selected.start,
            highlighted,
            bordered,
            plan: selected.plan,
        })
    }

    /// 按 reference 选中（取第一条）
    pub fn select_reference(&mut self, reference: &str) -> BoardResult<Selection> {
        let index = self
            .dataset
            .appointments
            .iter()
            .position(|a| a.reference == reference)
            .ok_or_else(|| BoardError::ReferenceNotFound(reference.to_string()))?;
        self.select(index)
    }

    /// 清除选中状态
    pub fn clear_selection(&mut self) {
        for a in self.dataset.appointments.iter_mut() {
            a.highlighted = false;
            a.border = false;
        }
        self.selected_reference = None;
    }

    /// 预约条展示颜色（高亮优先）
    pub fn display_color(&self, index: usize) -> BoardResult<&str> {
        let a = self.appointment(index)?;
        Ok(if a.highlighted {
            self.highlight_color.as_str()
        } else {
            a.fill_color.as_str()
        })
    }

    // ==========================================
    // 拖动/更新
    // ==========================================

    /// 校验更新: 不允许移动到其他资源
    pub fn check_update(&self, index: usize, new_resource_id: u32) -> BoardResult<()> {
        let a = self.appointment(index)?;
        if a.resource_id != new_resource_id {
            warn!(
                reference = %a.reference,
                from = a.resource_id,
                to = new_resource_id,
                "拒绝跨资源移动"
            );
            return Err(BoardError::CrossResourceMove {
                reference: a.reference.clone(),
                from: a.resource_id,
                to: new_resource_id,
            });
        }
        Ok(())
    }

    /// 应用更新（同资源内调整时间）
    pub fn apply_update(
        &mut self,
        index: usize,
        new_resource_id: u32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> BoardResult<()> {
        self.check_update(index, new_resource_id)?;

        let a = &mut self.dataset.appointments[index];
        if end < start {
            return Err(BoardError::InvalidInterval {
                reference: a.reference.clone(),
            });
        }
        a.start = start;
        a.end = end;
        a.plan.start = start;
        a.plan.end = end;
        Ok(())
    }

    // ==========================================
    // 重新加载
    // ==========================================

    /// 替换数据集并恢复上次选中
    ///
    /// # 返回
    /// - Some(时间): 上次选中的工序计划仍存在，返回其开始时间作为滚动目标
    /// - None: 无上次选中或已不存在
    pub fn reload(&mut self, dataset: GanttDataset) -> Option<NaiveDateTime> {
        self.dataset = dataset;
        let reference = self.selected_reference.take()?;
        match self.select_reference(&reference) {
            Ok(selection) => Some(selection.scroll_to),
            Err(_) => {
                debug!(reference = %reference, "重新加载后上次选中的工序计划已不存在");
                None
            }
        }
    }

    // ==========================================
    // 提示框
    // ==========================================

    /// 提示框文本（每行 "标签: 值"）
    pub fn tooltip(&self, index: usize) -> BoardResult<String> {
        let a = self.appointment(index)?;
        Ok(a.tooltip_lines()
            .into_iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
