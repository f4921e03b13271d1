// Entity models
//
// Categories are shared by every user; expenses always belong to exactly one.

pub mod category;
pub mod expense;

pub use category::{add_category, find_category, list_categories, Category};
pub use expense::{parse_amount, parse_expense_date, Expense, ExpenseFilter, NewExpense};
