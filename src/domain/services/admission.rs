use crate::domain::models::request::{ParticipationRequest, RequestStatus};

/// Initial status of a freshly created participation request. Organizer
/// approval only applies when the event both moderates requests and has a
/// finite capacity; everything else confirms on the spot.
pub fn initial_status(request_moderation: bool, participant_limit: i32) -> RequestStatus {
    if request_moderation && participant_limit > 0 {
        RequestStatus::Pending
    } else {
        RequestStatus::Confirmed
    }
}

/// Reorders loaded request rows to match the id order the caller supplied.
/// Ids that did not resolve to a row are skipped.
pub fn order_as_requested(
    mut requests: Vec<ParticipationRequest>,
    ids: &[i64],
) -> Vec<ParticipationRequest> {
    let mut ordered = Vec::with_capacity(requests.len());
    for id in ids {
        if let Some(pos) = requests.iter().position(|r| r.id == *id) {
            ordered.push(requests.remove(pos));
        }
    }
    ordered
}

/// Splits a batch of pending requests into (to confirm, to reject): the
/// first `available_slots` entries fit, the rest are turned away.
pub fn partition_by_capacity(
    requests: Vec<ParticipationRequest>,
    available_slots: i64,
) -> (Vec<ParticipationRequest>, Vec<ParticipationRequest>) {
    let cut = (available_slots.max(0) as usize).min(requests.len());
    let mut confirmed = requests;
    let rejected = confirmed.split_off(cut);
    (confirmed, rejected)
}
