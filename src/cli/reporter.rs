// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::inspect::InspectReport;
use crate::geometry::Welded;
use crate::io::{Layout, MeshComparison, Representation};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished export
    pub fn report_export(
        output: &str,
        welded: &Welded,
        layout: Layout,
        representation: Representation,
        byte_size: usize,
        duration: Duration,
    ) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Exported:".bold(), output.cyan());
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {} {} {}",
            "Container:".bright_black(),
            format!("v{}", layout.version_string()).cyan(),
            representation.as_str().bright_black()
        );
        println!(
            "  {} {} ({} merged)",
            "Vertices:".bright_black(),
            welded.mesh.vertex_count().to_string().cyan(),
            welded.merged_count()
        );
        println!(
            "  {} {}",
            "Triangles:".bright_black(),
            welded.mesh.triangle_count().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Size:".bright_black(),
            format!("{} bytes", byte_size).cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the summary of an inspected container
    pub fn report_inspect(report: &InspectReport) {
        println!("\n{} {}", "File:".bold(), report.path.cyan());
        println!(
            "  {} {} ({}, {} byte records)",
            "Version:".bright_black(),
            report.version.cyan(),
            report.representation.as_str(),
            report.vertex_record_size
        );
        println!(
            "  {} {}",
            "Vertices:".bright_black(),
            report.vertex_count.to_string().cyan()
        );
        println!(
            "  {} {} ({} triangles)",
            "Indices:".bright_black(),
            report.index_count.to_string().cyan(),
            report.triangle_count
        );
        if let Some([xmin, xmax, ymin, ymax, zmin, zmax]) = report.extent {
            println!(
                "  {} [{}, {}] x [{}, {}] x [{}, {}]",
                "Extent:".bright_black(),
                xmin,
                xmax,
                ymin,
                ymax,
                zmin,
                zmax
            );
        }
    }

    /// Report the outcome of a post-conversion verification
    pub fn report_comparison(comparison: &MeshComparison) {
        if comparison.passed {
            println!("{} {}", "✅".green(), "Round-trip verified".green().bold());
        } else {
            println!("{} {}", "❌".red(), "Round-trip mismatch".red().bold());
        }

        Self::print_check("Vertex count", comparison.vertex_count_match, comparison.vertex_count_diff);
        Self::print_check("Index count", comparison.index_count_match, comparison.index_count_diff);
        Self::print_check("Indices", comparison.indices_match, 0);
        Self::print_check("Extent", comparison.extent_match, 0);
        println!(
            "  {} {:e} (tolerance {:e})",
            "Max delta:".bright_black(),
            comparison.max_attribute_delta,
            comparison.tolerance
        );
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_check(name: &str, ok: bool, diff: i64) {
        let status = if ok { "ok".green() } else { "differs".red() };
        let diff_str = if diff != 0 {
            format!("(Δ{:+})", diff)
        } else {
            String::new()
        };
        println!(
            "  {} {} {}",
            format!("{}:", name).bright_black(),
            status,
            diff_str.bright_black()
        );
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(Reporter::format_duration(Duration::from_micros(500)), "500µs");
        assert_eq!(Reporter::format_duration(Duration::from_millis(5)), "5.00ms");
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
