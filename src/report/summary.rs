//! Training summary report

use std::time::Duration;

use chrono::{DateTime, Local};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of a training run
#[derive(Debug)]
pub struct TrainingSummary {
    pub applicants: usize,
    pub credit_records: usize,
    pub labelled_clients: usize,
    pub bad_clients: usize,
    pub training_rows: usize,
    /// Share of bad clients among the joined training rows
    pub training_bad_rate: f64,
    pub unmatched_applicants: usize,
    pub numeric_features: usize,
    pub categorical_features: usize,
    pub encoded_width: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub iterations: usize,
    pub converged: bool,
    /// Penalised weighted log-loss at the final iterate
    pub objective: f64,
    pub accuracy: f64,
    pub step_times: Vec<(String, Duration)>,
    pub finished_at: DateTime<Local>,
}

impl Default for TrainingSummary {
    fn default() -> Self {
        Self {
            applicants: 0,
            credit_records: 0,
            labelled_clients: 0,
            bad_clients: 0,
            training_rows: 0,
            training_bad_rate: 0.0,
            unmatched_applicants: 0,
            numeric_features: 0,
            categorical_features: 0,
            encoded_width: 0,
            train_rows: 0,
            test_rows: 0,
            iterations: 0,
            converged: false,
            objective: 0.0,
            accuracy: 0.0,
            step_times: Vec::new(),
            finished_at: Local::now(),
        }
    }
}

impl TrainingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step(&mut self, name: &str, elapsed: Duration) {
        self.step_times.push((name.to_string(), elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.step_times.iter().map(|(_, d)| *d).sum()
    }

    /// Share of labelled clients that are bad
    pub fn bad_client_rate(&self) -> f64 {
        if self.labelled_clients == 0 {
            0.0
        } else {
            self.bad_clients as f64 / self.labelled_clients as f64
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Local::now();
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Applicants"), Cell::new(self.applicants)]);
        table.add_row(vec![
            Cell::new("🗂️  Credit history rows"),
            Cell::new(self.credit_records),
        ]);
        table.add_row(vec![
            Cell::new("🏷️  Labelled clients"),
            Cell::new(format!(
                "{} ({:.1}% bad)",
                self.labelled_clients,
                self.bad_client_rate() * 100.0
            )),
        ]);
        table.add_row(vec![
            Cell::new("🔗 Training rows"),
            Cell::new(format!(
                "{} ({:.1}% bad)",
                self.training_rows,
                self.training_bad_rate * 100.0
            )),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Without history"),
            Cell::new(self.unmatched_applicants).fg(if self.unmatched_applicants == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("🔢 Features"),
            Cell::new(format!(
                "{} numeric, {} categorical → {} columns",
                self.numeric_features, self.categorical_features, self.encoded_width
            )),
        ]);
        table.add_row(vec![
            Cell::new("✂️  Train / test"),
            Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Solver iterations"),
            Cell::new(self.iterations).fg(if self.converged {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("📉 Final objective"),
            Cell::new(format!("{:.4}", self.objective)),
        ]);

        let color = if self.accuracy >= 0.8 {
            Color::Green
        } else if self.accuracy >= 0.6 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new("🎯 Test accuracy"),
            Cell::new(format!("{:.2}", self.accuracy))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Total time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);
        table.add_row(vec![
            Cell::new("🕒 Finished"),
            Cell::new(self.finished_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRAINING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        if !self.step_times.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("⏱️").cyan(),
                style("STEP TIMINGS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (name, elapsed) in &self.step_times {
                println!(
                    "      {} {:<28} {}",
                    style("•").dim(),
                    name,
                    style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
                );
            }
        }

        if !self.converged {
            println!();
            println!(
                "    {} {}",
                style("!").yellow().bold(),
                style("Solver hit its iteration budget before converging").yellow()
            );
        }
    }
}
