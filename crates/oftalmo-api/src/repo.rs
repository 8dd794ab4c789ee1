//! Typed record access shared by the route handlers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use oftalmo_core::keys;
use oftalmo_core::models::clinic::Clinic;
use oftalmo_core::models::collaborator::Collaborator;
use oftalmo_core::models::evaluation::Evaluation;
use oftalmo_core::models::patient::Patient;
use oftalmo_storage::error::StorageError;
use oftalmo_storage::records;

use crate::error::ApiError;
use crate::state::AppState;

async fn fetch<T: DeserializeOwned>(
    state: &AppState,
    key: &str,
    what: &str,
    id: Uuid,
) -> Result<(T, String), ApiError> {
    records::load(state.store(), key).await.map_err(|e| match e {
        StorageError::NotFound { .. } => ApiError::NotFound(format!("{what} not found: {id}")),
        other => other.into(),
    })
}

/// Load, mutate and write back a record under its ETag.
///
/// A concurrent writer between the load and the save makes the save fail
/// with 409 rather than silently overwriting the other change.
async fn modify<T, R, F>(
    state: &AppState,
    key: &str,
    what: &str,
    id: Uuid,
    f: F,
) -> Result<(T, R), ApiError>
where
    T: DeserializeOwned + Serialize + Send + Sync,
    F: FnOnce(&mut T) -> Result<R, ApiError> + Send,
{
    let (mut record, etag) = fetch::<T>(state, key, what, id).await?;
    let out = f(&mut record)?;
    records::save_if_match(state.store(), key, &record, &etag).await?;
    Ok((record, out))
}

pub async fn get_patient(state: &AppState, id: Uuid) -> Result<Patient, ApiError> {
    Ok(fetch(state, &keys::patient(id), "patient", id).await?.0)
}

pub async fn get_collaborator(state: &AppState, id: Uuid) -> Result<Collaborator, ApiError> {
    Ok(fetch(state, &keys::collaborator(id), "collaborator", id).await?.0)
}

pub async fn get_clinic(state: &AppState, id: Uuid) -> Result<Clinic, ApiError> {
    Ok(fetch(state, &keys::clinic(id), "clinic", id).await?.0)
}

pub async fn get_evaluation(state: &AppState, id: Uuid) -> Result<Evaluation, ApiError> {
    Ok(fetch(state, &keys::evaluation(id), "evaluation", id).await?.0)
}

pub async fn list_patients(state: &AppState) -> Result<Vec<Patient>, ApiError> {
    Ok(records::load_all(state.store(), keys::PATIENTS_PREFIX).await?)
}

pub async fn list_collaborators(state: &AppState) -> Result<Vec<Collaborator>, ApiError> {
    Ok(records::load_all(state.store(), keys::COLLABORATORS_PREFIX).await?)
}

pub async fn list_clinics(state: &AppState) -> Result<Vec<Clinic>, ApiError> {
    Ok(records::load_all(state.store(), keys::CLINICS_PREFIX).await?)
}

pub async fn list_evaluations(state: &AppState) -> Result<Vec<Evaluation>, ApiError> {
    Ok(records::load_all(state.store(), keys::EVALUATIONS_PREFIX).await?)
}

/// Evaluations of one patient, newest visit first.
pub async fn patient_evaluations(
    state: &AppState,
    patient_id: Uuid,
) -> Result<Vec<Evaluation>, ApiError> {
    let mut evaluations: Vec<Evaluation> = list_evaluations(state)
        .await?
        .into_iter()
        .filter(|e| e.patient_id == patient_id)
        .collect();
    evaluations.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    Ok(evaluations)
}

/// Resolve collaborator ids, failing on the first unknown one.
pub async fn require_collaborators(
    state: &AppState,
    ids: &[Uuid],
) -> Result<Vec<Collaborator>, ApiError> {
    let mut found = Vec::with_capacity(ids.len());
    for id in ids {
        found.push(get_collaborator(state, *id).await.map_err(|e| match e {
            ApiError::NotFound(msg) => ApiError::BadRequest(msg),
            other => other,
        })?);
    }
    Ok(found)
}

/// Resolve collaborator ids, skipping any that no longer exist.
pub async fn existing_collaborators(
    state: &AppState,
    ids: &[Uuid],
) -> Result<Vec<Collaborator>, ApiError> {
    let mut found = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some((c, _)) =
            records::load_optional::<Collaborator>(state.store(), &keys::collaborator(*id)).await?
        {
            found.push(c);
        }
    }
    Ok(found)
}

pub async fn save_new<T: Serialize + Sync>(
    state: &AppState,
    key: &str,
    record: &T,
) -> Result<(), ApiError> {
    records::save(state.store(), key, record).await?;
    Ok(())
}

pub async fn modify_patient<R, F>(state: &AppState, id: Uuid, f: F) -> Result<(Patient, R), ApiError>
where
    F: FnOnce(&mut Patient) -> Result<R, ApiError> + Send,
{
    modify(state, &keys::patient(id), "patient", id, f).await
}

pub async fn modify_collaborator<R, F>(
    state: &AppState,
    id: Uuid,
    f: F,
) -> Result<(Collaborator, R), ApiError>
where
    F: FnOnce(&mut Collaborator) -> Result<R, ApiError> + Send,
{
    modify(state, &keys::collaborator(id), "collaborator", id, f).await
}

pub async fn modify_clinic<R, F>(state: &AppState, id: Uuid, f: F) -> Result<(Clinic, R), ApiError>
where
    F: FnOnce(&mut Clinic) -> Result<R, ApiError> + Send,
{
    modify(state, &keys::clinic(id), "clinic", id, f).await
}

pub async fn modify_evaluation<R, F>(
    state: &AppState,
    id: Uuid,
    f: F,
) -> Result<(Evaluation, R), ApiError>
where
    F: FnOnce(&mut Evaluation) -> Result<R, ApiError> + Send,
{
    modify(state, &keys::evaluation(id), "evaluation", id, f).await
}

/// Delete an evaluation together with its attachment objects.
pub async fn delete_evaluation_cascade(state: &AppState, id: Uuid) -> Result<usize, ApiError> {
    let removed = state
        .store()
        .delete_prefix(&keys::evaluation_attachments_prefix(id))
        .await?;
    state.store().delete(&keys::evaluation(id)).await?;
    Ok(removed)
}
