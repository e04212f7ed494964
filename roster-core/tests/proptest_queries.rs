use chrono::NaiveDate;
use proptest::prelude::*;
use roster_core::model::{Employee, EmployeeId};
use roster_core::query::{average_salary_by_department, sort_for_listing};

const DEPARTMENTS: &[&str] = &["Eng", "Sales", "Ops"];

// Strategy for a batch of records with distinct ids
fn arb_records() -> impl Strategy<Value = Vec<Employee>> {
    prop::collection::vec(
        (0usize..DEPARTMENTS.len(), 0.0f64..1_000_000.0, 0i64..3650),
        0..40,
    )
    .prop_map(|rows| {
        let base = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        rows.into_iter()
            .enumerate()
            .map(|(i, (dept, salary, days))| Employee {
                employee_id: EmployeeId::new(&format!("E{:04}", i)).unwrap(),
                name: format!("Employee {}", i),
                department: DEPARTMENTS[dept].to_string(),
                salary,
                joining_date: base + chrono::Duration::days(days),
                skills: Default::default(),
            })
            .collect()
    })
}

proptest! {
    /// Property: averages never depend on the order records are visited
    #[test]
    fn prop_average_is_order_independent(records in arb_records()) {
        let forward = average_salary_by_department(&records);
        let mut reversed = records.clone();
        reversed.reverse();
        let backward = average_salary_by_department(&reversed);

        prop_assert_eq!(forward.len(), backward.len());
        for (dept, avg) in &forward {
            prop_assert_eq!(avg.to_bits(), backward[dept].to_bits());
        }
    }

    /// Property: only departments with records appear, and each mean lies within its range
    #[test]
    fn prop_average_within_bounds(records in arb_records()) {
        let averages = average_salary_by_department(&records);

        for (dept, avg) in &averages {
            let salaries: Vec<f64> = records
                .iter()
                .filter(|e| &e.department == dept)
                .map(|e| e.salary)
                .collect();
            prop_assert!(!salaries.is_empty());
            let min = salaries.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = salaries.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(*avg >= min - 1e-6 && *avg <= max + 1e-6);
        }
        for e in &records {
            prop_assert!(averages.contains_key(&e.department));
        }
    }

    /// Property: listing order is non-decreasing by (joining_date, employee_id)
    #[test]
    fn prop_listing_sorted(mut records in arb_records()) {
        sort_for_listing(&mut records);

        for pair in records.windows(2) {
            let a = (&pair[0].joining_date, &pair[0].employee_id);
            let b = (&pair[1].joining_date, &pair[1].employee_id);
            prop_assert!(a <= b);
        }
    }
}
