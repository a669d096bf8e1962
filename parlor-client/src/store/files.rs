use log::{debug, info, warn};

use super::{FetchOutcome, RoomStore, StoreError, Tab};
use crate::{ClientEvent, FileId, FileKind, FileQuery, Gateway, NewFile};

/// Where in a room's file area to browse, and what to filter by.
#[derive(Debug, Clone, Default)]
pub struct FileBrowse {
    /// The folder to list, or the file root when None
    pub parent_id: Option<FileId>,
    /// Matches file names when set
    pub search: Option<String>,
}

impl FileBrowse {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn folder(parent_id: FileId) -> Self {
        Self {
            parent_id: Some(parent_id),
            search: None,
        }
    }
}

impl<G> RoomStore<G>
where
    G: Gateway,
{
    /// How many file entries are requested per page.
    pub const FILES_PAGE_SIZE: usize = 50;

    /// Loads the next page of the browsed folder. Files page by offset, so
    /// the number of loaded entries is where the next page starts. Navigating
    /// to another folder or changing the search is done with a reset.
    pub async fn files_page(
        &self,
        browse: &FileBrowse,
        reset: bool,
    ) -> Result<FetchOutcome, StoreError> {
        let (epoch, room_id, skip) = {
            let mut state = self.state.lock();
            let room_id = Self::selected_id(&state)?;

            if !state.tabs.get_mut(Tab::Files).try_begin(reset) {
                return Ok(FetchOutcome::Skipped);
            }

            if reset {
                state.files.clear();
            }

            (state.epoch, room_id, state.files.len())
        };

        let query = FileQuery {
            parent_id: browse.parent_id.clone(),
            search: browse.search.clone(),
            skip,
            take: Self::FILES_PAGE_SIZE,
        };

        let result = self.context.gateway.room_files(room_id, query).await;

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                self.abort_fetch(Tab::Files, epoch);
                return Err(e.into());
            }
        };

        let appended = entries.len();
        {
            let mut state = self.state.lock();

            if state.epoch != epoch {
                warn!("Discarding stale file page for room {}", room_id);
                return Ok(FetchOutcome::Skipped);
            }

            state.files.extend(entries);
            state.tabs.get_mut(Tab::Files).finish(appended);
        }

        debug!("Loaded {} file entries for room {}", appended, room_id);
        self.context.emit(ClientEvent::TabUpdated {
            room_id,
            tab: Tab::Files,
            appended,
        });

        Ok(FetchOutcome::Fetched { appended })
    }

    /// Creates a folder in the room's file area, then reloads the parent
    /// folder so the new entry shows up.
    pub async fn create_folder(
        &self,
        parent_id: Option<FileId>,
        name: &str,
    ) -> Result<FetchOutcome, StoreError> {
        let (epoch, room_id) = {
            let state = self.state.lock();
            (state.epoch, Self::selected_id(&state)?)
        };

        self.context
            .gateway
            .create_file(NewFile {
                room_id,
                parent_id: parent_id.clone(),
                file_name: name.to_string(),
                file_extension: "folder".to_string(),
                file_type: FileKind::Folder,
            })
            .await?;

        info!("Created folder {} in room {}", name, room_id);

        {
            let state = self.state.lock();
            if state.epoch != epoch {
                warn!("Not reloading files for room {} after leaving it", room_id);
                return Ok(FetchOutcome::Skipped);
            }
        }

        let browse = FileBrowse {
            parent_id,
            search: None,
        };
        self.files_page(&browse, true).await
    }
}
