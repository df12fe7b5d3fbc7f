//! The `adaptest init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("adaptest.toml").exists() {
        println!("adaptest.toml already exists, skipping.");
    } else {
        std::fs::write("adaptest.toml", SAMPLE_CONFIG)?;
        println!("Created adaptest.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit adaptest.toml with your name and skills");
    println!("  2. Start the question service (default http://localhost:5001)");
    println!("  3. Run: adaptest check");
    println!("  4. Run: adaptest run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptest configuration

[gateway]
base_url = "http://localhost:5001"
timeout_secs = 30

[session]
length = 5

[retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 8000

[student]
name = "Harish"
level = "Intermediate"
total_tests = 0
avg_accuracy = 0.0
streak = 0
skills = [
    { name = "Python", mastery = 85 },
    { name = "Data Structures", mastery = 60 },
    { name = "Algorithms", mastery = 45 },
]
"#;
