#![allow(dead_code)]

extern crate std;

use crate::types::{Application, ApplicationStatus, Scholarship};

/// INV-1: filled slots never exceed total slots.
pub fn assert_slots_within_bounds(scholarship: &Scholarship) {
    assert!(
        scholarship.filled_slots <= scholarship.total_slots,
        "INV-1 violated: scholarship {} has {} of {} slots filled",
        scholarship.id,
        scholarship.filled_slots,
        scholarship.total_slots
    );
}

/// INV-2: at least one slot, non-negative award.
pub fn assert_terms_valid(scholarship: &Scholarship) {
    assert!(
        scholarship.total_slots >= 1,
        "INV-2 violated: scholarship {} has no slots",
        scholarship.id
    );
    assert!(
        scholarship.amount_per_slot >= 0,
        "INV-2 violated: scholarship {} has negative amount_per_slot ({})",
        scholarship.id,
        scholarship.amount_per_slot
    );
}

/// INV-3: the escrow balance matches the unpaid slots until the remainder
/// is withdrawn, and is zero afterwards.
pub fn assert_escrow_matches_slots(scholarship: &Scholarship, escrow_balance: i128) {
    let expected = if scholarship.reclaimed {
        0
    } else {
        scholarship.amount_per_slot * (scholarship.total_slots - scholarship.filled_slots) as i128
    };
    assert_eq!(
        escrow_balance, expected,
        "INV-3 violated: scholarship {} escrow {} != expected {}",
        scholarship.id, escrow_balance, expected
    );
}

/// INV-4: application indices are sequential from 0 and the list length
/// equals `total_applications`.
pub fn assert_sequential_indices(scholarship: &Scholarship, applications: &[Application]) {
    assert_eq!(
        applications.len() as u32,
        scholarship.total_applications,
        "INV-4 violated: {} applications listed, counter says {}",
        applications.len(),
        scholarship.total_applications
    );
    for (i, application) in applications.iter().enumerate() {
        assert_eq!(
            application.index, i as u32,
            "INV-4 violated: expected index {}, got {}",
            i, application.index
        );
        assert_eq!(application.scholarship_id, scholarship.id);
    }
}

/// INV-5: a status change follows an edge of the lifecycle graph.
pub fn assert_valid_status_transition(from: ApplicationStatus, to: ApplicationStatus) {
    assert!(
        from.can_transition_to(to),
        "INV-5 violated: invalid status transition from {:?} to {:?}",
        from,
        to
    );
}

/// INV-6: fields fixed at creation never change.
pub fn assert_scholarship_immutable_fields(original: &Scholarship, current: &Scholarship) {
    assert_eq!(original.id, current.id, "INV-6 violated: id changed");
    assert_eq!(original.creator, current.creator, "INV-6 violated: creator changed");
    assert_eq!(
        original.amount_per_slot, current.amount_per_slot,
        "INV-6 violated: amount_per_slot changed"
    );
    assert_eq!(
        original.total_slots, current.total_slots,
        "INV-6 violated: total_slots changed"
    );
    assert_eq!(original.deadline, current.deadline, "INV-6 violated: deadline changed");
}

/// INV-7: paid applications never outnumber filled slots.
pub fn assert_paid_matches_filled(scholarship: &Scholarship, applications: &[Application]) {
    let paid = applications
        .iter()
        .filter(|a| a.status == ApplicationStatus::Paid)
        .count() as u32;
    assert_eq!(
        paid, scholarship.filled_slots,
        "INV-7 violated: {} paid applications but {} filled slots",
        paid, scholarship.filled_slots
    );
}

/// Run all stateless scholarship invariants.
pub fn assert_all_scholarship_invariants(scholarship: &Scholarship) {
    assert_slots_within_bounds(scholarship);
    assert_terms_valid(scholarship);
}
