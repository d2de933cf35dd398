use crate::records::Expense;

/// One slice of the spending chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category: String,
    pub total: f64,
}

/// Category totals for the spending chart.
///
/// Pure aggregation over the expense list: amounts are summed per category,
/// and slice order follows each category's first appearance in the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryBreakdown {
    slices: Vec<CategorySlice>,
}

impl CategoryBreakdown {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut slices: Vec<CategorySlice> = Vec::new();
        for expense in expenses {
            match slices.iter_mut().find(|s| s.category == expense.category) {
                Some(slice) => slice.total += expense.amount,
                None => slices.push(CategorySlice {
                    category: expense.category.clone(),
                    total: expense.amount,
                }),
            }
        }
        Self { slices }
    }

    pub fn slices(&self) -> &[CategorySlice] {
        &self.slices
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn grand_total(&self) -> f64 {
        self.slices.iter().map(|s| s.total).sum()
    }
}
