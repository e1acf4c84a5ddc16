//! Row formatting for records, validation reports and expansions.

use super::terminal::{format_field, format_state};
use crate::models::RecordView;
use crate::processing::Expansion;
use crate::registry::ValidationReport;
use colored::Colorize;
use itertools::Itertools;

/// Header line matching [`record_row`].
pub fn record_header() -> String {
    format!(
        "{id},{address},{state},{assigned},{student},{created},{description}",
        id = format_field("id", 38),
        address = format_field("address", 34),
        state = format_field("state", 10),
        assigned = format_field("assigned", 10),
        student = format_field("student", 9),
        created = format_field("created_at", 22),
        description = format_field("description", 1),
    )
}

/// One CSV-style row for a record.
pub fn record_row(view: &RecordView) -> String {
    let record = &view.record;
    format!(
        "{id},{address},{state},{assigned},{student},{created},{description}",
        id = format_field(record.id, 38),
        address = format_field(&record.address, 34),
        state = format_field(format_state(record.state()), 10),
        assigned = format_field(view.assigned_count, 10),
        student = format_field(
            record
                .assigned_student_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            9
        ),
        created = format_field(record.created_at.format("%Y-%m-%d %H:%M:%S"), 22),
        description = format_field(record.description.as_deref().unwrap_or_default(), 1),
    )
}

/// Print records as CSV to stdout.
pub fn print_records(views: &[RecordView]) {
    log::debug!("print_records() count={}", views.len());
    println!("{}", record_header());
    for view in views {
        println!("{}", record_row(view));
    }
    println!("# {} record(s)", views.len());
}

pub fn print_report(report: &ValidationReport) {
    println!(
        "{} {} ({}) ips=[{}]",
        "VALID".on_green(),
        report.input_type,
        report.input_type_description,
        report.ips.iter().join(", ")
    );
}

pub fn print_expansion(expansion: &Expansion) {
    match expansion {
        Expansion::Hosts(hosts) => {
            for host in hosts {
                println!("{host}");
            }
            println!("# {} host address(es)", hosts.len());
        }
        Expansion::Single(ip) => println!("{ip}"),
        Expansion::Symbolic(block) => println!(
            "{block} {}",
            "[not enumerated: IPv6 blocks are kept symbolic]".yellow()
        ),
        Expansion::Nothing => println!("{}", "nothing to expand".on_red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AddressRecord;

    #[test]
    fn test_record_row_fields() {
        colored::control::set_override(false);
        let mut record = AddressRecord::new("10.0.0.0/24", Some("lab".to_string()));
        record.assigned_student_id = None;
        let view = RecordView {
            record: record.clone(),
            is_assigned: false,
            assigned_count: 3,
        };
        let row = record_row(&view);
        assert!(row.contains("\"10.0.0.0/24\""));
        assert!(row.contains("\"active\""));
        assert!(row.contains("\"3\""));
        assert!(row.contains("\"-\""));
        assert!(row.ends_with("\"lab\""));
        assert!(row.contains(&record.id.to_string()));
    }

    #[test]
    fn test_header_column_count_matches_row() {
        let view = RecordView {
            record: AddressRecord::new("10.0.0.1", None),
            is_assigned: false,
            assigned_count: 0,
        };
        assert_eq!(
            record_header().matches(',').count(),
            record_row(&view).matches(',').count()
        );
    }
}
