use kvstore::KvStore;
use prusalink::{PrinterJob, PrinterState};
use tracing::warn;

pub const KEY_LAST_STATE: &str = "lastState";
pub const KEY_LAST_JOB_ID: &str = "lastJobId";
pub const KEY_LAST_JOB_NAME: &str = "lastJobName";
pub const KEY_LAST_JOB_THUMBNAIL: &str = "lastJobThumbnail";

/// What the previous tick decided. `last_state == None` means no
/// observation has been handled yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistedState {
    pub last_state: Option<PrinterState>,
    pub last_job_id: Option<u64>,
    pub last_job_name: Option<String>,
    pub last_job_thumbnail: Option<String>,
}

impl PersistedState {
    pub async fn load(store: &dyn KvStore) -> kvstore::Result<Self> {
        let last_state = match store.get(KEY_LAST_STATE).await? {
            Some(raw) => match raw.parse::<PrinterState>() {
                Ok(st) => Some(st),
                Err(e) => {
                    warn!(error = %e, "persisted: ignoring unreadable lastState");
                    None
                }
            },
            None => None,
        };

        let last_job_id = store
            .get(KEY_LAST_JOB_ID)
            .await?
            .and_then(|raw| raw.parse::<u64>().ok());

        Ok(Self {
            last_state,
            last_job_id,
            last_job_name: non_empty(store.get(KEY_LAST_JOB_NAME).await?),
            last_job_thumbnail: non_empty(store.get(KEY_LAST_JOB_THUMBNAIL).await?),
        })
    }
}

pub async fn save_state(store: &dyn KvStore, state: PrinterState) -> kvstore::Result<()> {
    store.set(KEY_LAST_STATE, state.as_str()).await
}

/// Records a fresh PRINTING transition. Job fields are only replaced
/// when the printer reported a job; all keys land in one batch.
pub async fn save_printing(store: &dyn KvStore, job: Option<&PrinterJob>) -> kvstore::Result<()> {
    let Some(job) = job else {
        return save_state(store, PrinterState::Printing).await;
    };

    let id = job.id.to_string();
    let thumbnail = job.file.refs.thumbnail.as_deref().unwrap_or("");
    store
        .set_many(&[
            (KEY_LAST_STATE, PrinterState::Printing.as_str()),
            (KEY_LAST_JOB_ID, id.as_str()),
            (KEY_LAST_JOB_NAME, job.file.label()),
            (KEY_LAST_JOB_THUMBNAIL, thumbnail),
        ])
        .await
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstore::InMemoryStore;

    #[tokio::test]
    async fn test_empty_store_is_first_run() {
        let store = InMemoryStore::new();
        let st = PersistedState::load(&store).await.unwrap();
        assert_eq!(st, PersistedState::default());
    }

    #[tokio::test]
    async fn test_garbage_state_treated_as_absent() {
        let store = InMemoryStore::new();
        store.set(KEY_LAST_STATE, "WARMING_UP").await.unwrap();
        store.set(KEY_LAST_JOB_ID, "not-a-number").await.unwrap();
        store.set(KEY_LAST_JOB_NAME, "foo.gcode").await.unwrap();

        let st = PersistedState::load(&store).await.unwrap();
        assert_eq!(st.last_state, None);
        assert_eq!(st.last_job_id, None);
        assert_eq!(st.last_job_name.as_deref(), Some("foo.gcode"));
    }

    #[tokio::test]
    async fn test_save_printing_without_job_keeps_old_fields() {
        let store = InMemoryStore::new();
        store.set(KEY_LAST_JOB_NAME, "old.gcode").await.unwrap();

        save_printing(&store, None).await.unwrap();

        let st = PersistedState::load(&store).await.unwrap();
        assert_eq!(st.last_state, Some(PrinterState::Printing));
        assert_eq!(st.last_job_name.as_deref(), Some("old.gcode"));
    }
}
