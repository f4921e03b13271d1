use anyhow::{Context, Result};
use clap::Parser;
use expense_tracker::cli::{AddExpenseArgs, Cli, Command, ListArgs, ReportKind};
use expense_tracker::{
    init_logging, AppConfig, Expense, ExpenseFilter, NewExpense, Outcome, Registration, Tracker,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    // Log lines would corrupt the alternate screen
    if cli.command != Command::Tui {
        init_logging(&config);
    }

    let rules = config
        .load_rules()
        .context("Failed to load suggestion rules")?;
    let mut tracker = Tracker::open(&config.db_path, rules)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;

    if cli.command.needs_login() {
        login(&mut tracker, &config)?;
    }

    match cli.command {
        Command::Register { email, birth_date } => {
            let (username, password) = config.credentials()?;
            tracker.register(&Registration {
                username: username.to_string(),
                password: password.to_string(),
                email,
                date_of_birth: birth_date,
            })?;
            println!("✓ Registered {}", username);
        }

        Command::RequestReset { email, birth_date } => {
            let username = config
                .username
                .as_deref()
                .context("--username is required")?;
            let token = tracker.request_password_reset(username, &email, &birth_date)?;
            println!("🔑 Reset token: {}", token.token);
            println!("   Valid until {}", token.expires_at.format("%Y-%m-%d %H:%M UTC"));
            println!("   Run: expense-tracker -u {} reset-password --token <token> --new-password <password>", username);
        }

        Command::ResetPassword { token, new_password } => {
            let username = config
                .username
                .as_deref()
                .context("--username is required")?;
            tracker.reset_password(username, &token, &new_password)?;
            println!("✓ Password updated for {}", username);
        }

        Command::Tui => run_tui(tracker, &config)?,

        Command::AddCategory { name } => match tracker.add_category(&name)? {
            Some(_) => println!("✓ Category added: {}", name.trim()),
            None => println!("Nothing to add (empty name)"),
        },

        Command::Categories => {
            let categories = tracker.categories()?;
            if categories.is_empty() {
                println!("📭 No categories yet. Add one with: expense-tracker add-category <name>");
            }
            for name in categories {
                println!("  {}", name);
            }
        }

        Command::AddExpense(args) => add_expense(&tracker, args)?,

        Command::List(args) => list(&tracker, args)?,

        Command::Total => {
            println!("💰 Total spent: {:.2}", tracker.total_spent()?);
        }

        Command::Report { kind } => report(&tracker, kind)?,

        Command::Export { out } => match tracker.export_all(&out)? {
            Outcome::Data(rows) => println!("✓ Exported {} expenses to {}", rows, out.display()),
            Outcome::NoData => println!("📭 No expenses to export."),
        },
    }

    Ok(())
}

fn login(tracker: &mut Tracker, config: &AppConfig) -> Result<()> {
    let (username, password) = config.credentials()?;
    tracker.login(username, password)?;
    Ok(())
}

fn add_expense(tracker: &Tracker, args: AddExpenseArgs) -> Result<()> {
    let category = match args.category {
        Some(c) => c,
        None if args.suggest => {
            let suggestion = tracker
                .suggest_category(&args.description)?
                .context("No category matches the description; pass --category")?;
            println!("💡 Suggested category: {} (rule {})", suggestion.category, suggestion.rule_id);
            suggestion.category
        }
        None => anyhow::bail!("--category is required (or use --suggest)"),
    };

    let id = tracker.record_expense(&NewExpense::new(
        &args.date,
        &category,
        &args.amount,
        &args.description,
    ))?;
    println!("✓ Expense #{} added", id);
    Ok(())
}

fn print_expenses(expenses: &[Expense]) {
    println!("{:<12} {:<20} {:>10}  {}", "Date", "Category", "Amount", "Description");
    println!("{}", "━".repeat(60));
    for e in expenses {
        println!(
            "{:<12} {:<20} {:>10.2}  {}",
            e.date.to_string(), e.category, e.amount, e.description
        );
    }
}

fn list(tracker: &Tracker, args: ListArgs) -> Result<()> {
    let filter = ExpenseFilter::parse(&args.keyword, args.from.as_deref(), args.to.as_deref())?;
    let expenses = tracker.filter_expenses(&filter)?;

    if expenses.is_empty() {
        println!("📭 No expenses to show.");
        return Ok(());
    }

    print_expenses(&expenses);
    let sum: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("{}", "━".repeat(60));
    println!("{} expenses, {:.2} total", expenses.len(), sum);
    Ok(())
}

fn report(tracker: &Tracker, kind: ReportKind) -> Result<()> {
    match kind {
        ReportKind::Monthly { out } => {
            let outcome = match &out {
                Some(path) => tracker.export_monthly_report(path)?,
                None => tracker.monthly_totals()?,
            };
            let Outcome::Data(report) = outcome else {
                println!("📭 No expenses to report.");
                return Ok(());
            };

            print!("{:<10}", "Month");
            for c in &report.categories {
                print!(" {:>12}", c);
            }
            println!(" {:>12}", "Total");

            for (month, values) in report.rows() {
                print!("{:<10}", month.to_string());
                for v in &values {
                    print!(" {:>12.2}", v);
                }
                println!(" {:>12.2}", report.month_total(month));
            }

            if let Some(path) = out {
                println!("✓ Monthly report written to {}", path.display());
            }
        }

        ReportKind::Categories => match tracker.category_totals()? {
            Outcome::Data(totals) => {
                for t in totals {
                    let bar = "█".repeat((t.share * 40.0).round() as usize);
                    println!("{:<20} {:>10.2} {:>6.1}%  {}", t.category, t.total, t.share * 100.0, bar);
                }
            }
            Outcome::NoData => println!("📭 No expenses to report."),
        },

        ReportKind::Spending => match tracker.monthly_spending()? {
            Outcome::Data(months) => {
                let max = months.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
                for (month, total) in months {
                    let width = if max > 0.0 { (total / max * 40.0).round() as usize } else { 0 };
                    println!("{}  {:>10.2}  {}", month, total, "█".repeat(width));
                }
            }
            Outcome::NoData => println!("📭 No expenses to report."),
        },
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_tui(mut tracker: Tracker, config: &AppConfig) -> Result<()> {
    // Log in up front when credentials were given; otherwise the login screen asks
    if config.credentials().is_ok() {
        login(&mut tracker, config)?;
    }

    let mut app = expense_tracker::ui::App::new(tracker);
    expense_tracker::ui::run_ui(&mut app)?;

    println!("\n✅ Bye");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_tui(_tracker: Tracker, _config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
