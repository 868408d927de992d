//! Budget row waterfall
//!
//! Reconciles manual assignments, expense defaults, goal and asset
//! contributions and actual spending into one row per identity. The work is
//! split into ordered layers over a shared accumulator. A layer may only add
//! rows whose id no earlier layer claimed, so the order of [`LAYERS`] is the
//! precedence: an explicit $0 assignment (layer 2) is never replaced by an
//! inferred default (layer 7).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::aggregate::{manual_by_subcategory, ExpenseDefault};
use crate::models::{
    AssetId, AssetSummary, AssignmentKind, BudgetRow, BudgetSnapshot, GoalId, GoalSummary, Money,
    RowKind, SubcategoryKey,
};

/// Rows built so far and the ids they claimed
#[derive(Debug, Clone, Default)]
pub struct RowAccumulator {
    rows: Vec<BudgetRow>,
    claimed: BTreeSet<String>,
}

impl RowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `row` unless its id is already taken; returns whether it was added
    pub fn claim(&mut self, row: BudgetRow) -> bool {
        if self.claimed.contains(&row.id) {
            tracing::trace!(id = %row.id, "row already claimed by an earlier layer");
            return false;
        }
        self.claimed.insert(row.id.clone());
        self.rows.push(row);
        true
    }

    pub fn is_claimed(&self, id: &str) -> bool {
        self.claimed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[BudgetRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<BudgetRow> {
        self.rows
    }
}

/// Everything the layers read
#[derive(Debug)]
pub struct WaterfallContext<'a> {
    snapshot: &'a BudgetSnapshot,
    assigned: BTreeMap<SubcategoryKey, Money>,
    goal_assigned: BTreeMap<GoalId, Money>,
    asset_assigned: BTreeMap<AssetId, Money>,
    expense_defaults: &'a BTreeMap<SubcategoryKey, ExpenseDefault>,
    spent: &'a BTreeMap<SubcategoryKey, Money>,
    goals: HashMap<&'a GoalId, &'a GoalSummary>,
    assets: HashMap<&'a AssetId, &'a AssetSummary>,
}

impl<'a> WaterfallContext<'a> {
    pub fn new(
        snapshot: &'a BudgetSnapshot,
        expense_defaults: &'a BTreeMap<SubcategoryKey, ExpenseDefault>,
        spent: &'a BTreeMap<SubcategoryKey, Money>,
    ) -> Self {
        let mut goal_assigned = BTreeMap::new();
        let mut asset_assigned = BTreeMap::new();
        for assignment in &snapshot.assignments {
            match (assignment.kind, &assignment.goal_id, &assignment.asset_id) {
                (AssignmentKind::Goal, Some(id), _) => {
                    *goal_assigned.entry(id.clone()).or_insert_with(Money::zero) +=
                        assignment.assigned;
                }
                (AssignmentKind::Asset, _, Some(id)) => {
                    *asset_assigned.entry(id.clone()).or_insert_with(Money::zero) +=
                        assignment.assigned;
                }
                _ => {}
            }
        }

        Self {
            snapshot,
            assigned: manual_by_subcategory(&snapshot.assignments),
            goal_assigned,
            asset_assigned,
            expense_defaults,
            spent,
            goals: snapshot.goals.iter().map(|g| (&g.id, g)).collect(),
            assets: snapshot.assets.iter().map(|a| (&a.id, a)).collect(),
        }
    }

    fn spent_for(&self, key: &SubcategoryKey) -> Money {
        self.spent.get(key).copied().unwrap_or_default()
    }

    fn goal_name(&self, id: &GoalId) -> String {
        self.goals
            .get(id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn asset_name(&self, id: &AssetId) -> String {
        self.assets
            .get(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn goal_contribution(&self, id: &GoalId) -> Money {
        self.snapshot
            .goal_contributions
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    fn asset_contribution(&self, id: &AssetId) -> Money {
        self.snapshot
            .asset_contributions
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    fn subcategory_row(&self, key: &SubcategoryKey, budgeted: Money) -> BudgetRow {
        BudgetRow::new(
            key.row_id(),
            RowKind::Subcategory,
            key.child.trim(),
            budgeted,
            self.spent_for(key),
        )
        .with_parent(key.parent.trim())
    }

    fn goal_row(&self, id: &GoalId, budgeted: Money) -> BudgetRow {
        BudgetRow::new(
            goal_row_id(id),
            RowKind::Goal,
            self.goal_name(id),
            budgeted,
            self.goal_contribution(id),
        )
        .with_parent("Goals")
    }

    fn asset_row(&self, id: &AssetId, budgeted: Money) -> BudgetRow {
        BudgetRow::new(
            asset_row_id(id),
            RowKind::Asset,
            self.asset_name(id),
            budgeted,
            self.asset_contribution(id),
        )
        .with_parent("Assets")
    }
}

pub fn goal_row_id(id: &GoalId) -> String {
    format!("goal:{}", id)
}

pub fn asset_row_id(id: &AssetId) -> String {
    format!("asset:{}", id)
}

/// A waterfall layer
pub type Layer = fn(RowAccumulator, &WaterfallContext<'_>) -> RowAccumulator;

/// The layers, highest precedence first
pub const LAYERS: [(&str, Layer); 9] = [
    ("manual assignments", manual_assignments),
    ("seeded expense defaults", seeded_defaults),
    ("goal assignments", goal_assignments),
    ("asset assignments", asset_assignments),
    ("unassigned goals", default_goals),
    ("unassigned assets", default_assets),
    ("remaining expense defaults", remaining_defaults),
    ("unplanned spending", unplanned_spending),
    ("display placeholders", display_placeholders),
];

/// Run every layer in order and return the rows
pub fn build_rows(ctx: &WaterfallContext<'_>) -> Vec<BudgetRow> {
    LAYERS
        .iter()
        .fold(RowAccumulator::new(), |acc, (name, layer)| {
            let before = acc.len();
            let acc = layer(acc, ctx);
            tracing::debug!(layer = *name, added = acc.len() - before, "waterfall layer");
            acc
        })
        .into_rows()
}

/// Layer 1: subcategories with a positive manual assignment
pub fn manual_assignments(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for (key, amount) in ctx.assigned.iter().filter(|(_, a)| a.is_positive()) {
        acc.claim(ctx.subcategory_row(key, *amount));
    }
    acc
}

/// Layer 2: subcategories explicitly assigned $0
///
/// A matching expense default fills in the amount and marks the row as
/// seeded; without one the row stays at zero.
pub fn seeded_defaults(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for (key, _) in ctx.assigned.iter().filter(|(_, a)| a.is_zero()) {
        let row = match ctx.expense_defaults.get(key) {
            Some(default) => ctx
                .subcategory_row(key, default.amount)
                .as_expense_default()
                .with_share(default.share_percentage),
            None => ctx.subcategory_row(key, Money::zero()),
        };
        acc.claim(row);
    }
    acc
}

/// Layer 3
pub fn goal_assignments(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for (id, amount) in &ctx.goal_assigned {
        acc.claim(ctx.goal_row(id, *amount));
    }
    acc
}

/// Layer 4
pub fn asset_assignments(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for (id, amount) in &ctx.asset_assigned {
        acc.claim(ctx.asset_row(id, *amount));
    }
    acc
}

/// Layer 5: open goals, or goals that received money, with no assignment
pub fn default_goals(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for goal in &ctx.snapshot.goals {
        if !goal.is_completed || !ctx.goal_contribution(&goal.id).is_zero() {
            acc.claim(ctx.goal_row(&goal.id, Money::zero()));
        }
    }
    for (id, amount) in &ctx.snapshot.goal_contributions {
        if !amount.is_zero() {
            acc.claim(ctx.goal_row(id, Money::zero()));
        }
    }
    acc
}

/// Layer 6: assets with no assignment
pub fn default_assets(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for asset in &ctx.snapshot.assets {
        acc.claim(ctx.asset_row(&asset.id, Money::zero()));
    }
    for (id, amount) in &ctx.snapshot.asset_contributions {
        if !amount.is_zero() {
            acc.claim(ctx.asset_row(id, Money::zero()));
        }
    }
    acc
}

/// Layer 7: expense defaults for subcategories nobody assigned
pub fn remaining_defaults(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for (key, default) in ctx.expense_defaults {
        acc.claim(
            ctx.subcategory_row(key, default.amount)
                .as_expense_default()
                .with_share(default.share_percentage),
        );
    }
    acc
}

/// Layer 8: spending with neither an assignment nor a default
pub fn unplanned_spending(mut acc: RowAccumulator, ctx: &WaterfallContext<'_>) -> RowAccumulator {
    for key in ctx.spent.keys() {
        if acc.claim(ctx.subcategory_row(key, Money::zero())) {
            tracing::debug!(subcategory = %key, "unplanned spending");
        }
    }
    acc
}

/// Layer 9: zero rows for configured subcategories that are still missing
pub fn display_placeholders(
    mut acc: RowAccumulator,
    ctx: &WaterfallContext<'_>,
) -> RowAccumulator {
    for display in &ctx.snapshot.display_categories {
        acc.claim(ctx.subcategory_row(&display.key(), Money::zero()));
    }
    acc
}
