/// Caregiver authorization predicates
///
/// Pure membership tests over relationships that were already loaded for the caller.
use super::relationship::Relationship;

/// True iff some relationship links exactly `user_id` to `receiver_id`.
pub fn is_caregiver(relationships: &[Relationship], user_id: &str, receiver_id: &str) -> bool {
    relationships.iter().any(|rel| rel.links(user_id, receiver_id))
}

/// True iff the linking relationship is the primary one. Gates inviting other caregivers.
pub fn is_primary_caregiver(relationships: &[Relationship], user_id: &str, receiver_id: &str) -> bool {
    relationships
        .iter()
        .any(|rel| rel.links(user_id, receiver_id) && rel.primary_care_giver)
}
