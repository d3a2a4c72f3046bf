use std::fmt;

use crate::{
    comic::{self, FetchedComic},
    config::Config,
    error::Error,
    photo::SavedPhoto,
    result::Result,
    upload::{UploadServer, UploadedPhoto},
    wall::WallPost,
    Client,
};

/// Progress of a publishing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    Init,
    /// Comic metadata and image are on local disk.
    Fetched,
    /// The image has been posted to an upload endpoint.
    Uploaded,
    /// The upload has been saved as a group photo.
    Saved,
    /// The wall post exists.
    Posted,
    /// The run finished and the local image has been removed.
    Done,
    /// The run stopped on an error; the local image has been removed.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Fetched => "fetched",
            Stage::Uploaded => "uploaded",
            Stage::Saved => "saved",
            Stage::Posted => "posted",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The result of a successful run.
#[derive(Debug, Clone)]
pub struct Published {
    /// Id of the new wall post.
    pub post_id: i64,
    /// Attachment reference used in the post.
    pub attachment: String,
}

/// How the upload-through-post part of a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The comic is on the wall.
    Posted(Published),
    /// A step failed. Photos or posts created before the failure are left as they are.
    Failed {
        /// Last stage reached before the failing step.
        after: Stage,
        /// What went wrong.
        error: Error,
    },
}

/// Summary of a run that got as far as fetching a comic.
#[derive(Debug)]
pub struct Report {
    index: u32,
    caption: String,
    outcome: Outcome,
}

impl Report {
    /// Returns the comic number that was picked.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the caption that was (or would have been) posted.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Returns the terminal stage: [`Stage::Done`] or [`Stage::Failed`].
    pub fn stage(&self) -> Stage {
        match self.outcome {
            Outcome::Posted(_) => Stage::Done,
            Outcome::Failed { .. } => Stage::Failed,
        }
    }

    /// Returns `true` if the comic was posted.
    pub fn is_posted(&self) -> bool {
        matches!(self.outcome, Outcome::Posted(_))
    }
}

/// Runs the fetch → upload → save → post sequence.
#[derive(Debug)]
pub struct Publisher {
    client: Client,
    config: Config,
}

impl Publisher {
    /// Creates a publisher and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientFormation`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::new(&config)?;
        Ok(Self { client, config })
    }

    /// Publishes a random comic.
    ///
    /// # Errors
    ///
    /// Only failures before the image is on disk are returned as `Err`:
    /// resolving the latest comic, fetching metadata, downloading the image.
    /// Later failures are logged and reported through [`Outcome::Failed`].
    pub async fn run(&self) -> Result<Report> {
        let latest = comic::latest_index(&self.client).await?;
        let index =
            comic::pick_index(&mut rand::thread_rng(), latest).ok_or(Error::InvalidIndex(latest))?;
        self.run_with_index(index).await
    }

    /// Publishes comic `index`.
    ///
    /// # Errors
    ///
    /// Same as [`Publisher::run`].
    pub async fn run_with_index(&self, index: u32) -> Result<Report> {
        let fetched = comic::fetch_comic(&self.client, index, self.config.work_dir()).await?;

        let mut stage = Stage::Fetched;
        let outcome = match self.publish(&fetched, &mut stage).await {
            Ok(published) => {
                log::info!(
                    "posted comic #{} as wall post {} ({})",
                    index,
                    published.post_id,
                    published.attachment
                );
                Outcome::Posted(published)
            }
            Err(error) => {
                log::error!("publishing comic #{} failed after {}: {}", index, stage, error);
                Outcome::Failed {
                    after: stage,
                    error,
                }
            }
        };

        let FetchedComic { caption, image, .. } = fetched;
        drop(image);

        Ok(Report {
            index,
            caption,
            outcome,
        })
    }

    async fn publish(&self, fetched: &FetchedComic, stage: &mut Stage) -> Result<Published> {
        let token = self.config.access_token();
        let group_id = self.config.group_id();

        let server = UploadServer::get(&self.client, token, group_id).await?;
        let uploaded = UploadedPhoto::upload(&self.client, &server, &fetched.image).await?;
        *stage = Stage::Uploaded;
        log::info!("uploaded {} to server {}", fetched.image.upload_name(), uploaded.server());

        let photo = SavedPhoto::save(&self.client, token, &uploaded, group_id).await?;
        *stage = Stage::Saved;
        log::info!("saved photo {}", photo.attachment());

        let post = WallPost::publish(&self.client, token, group_id, &fetched.caption, &photo).await?;
        *stage = Stage::Posted;

        Ok(Published {
            post_id: post.post_id(),
            attachment: photo.attachment(),
        })
    }
}
