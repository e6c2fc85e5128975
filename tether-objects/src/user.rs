use crate::{CreateOptions, Picture, PictureCollection};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tether_model::{DerivedRef, EntitySchema, FieldDescriptor};
use tether_sync::{Entity, Resource};
use tether_types::{ApiError, ApiResult, EntityId};
use tracing::debug;

const PICTURE_ID: &str = "profile_picture_id";
const PICTURE_URL: &str = "profile_picture_url";

static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new("user", "/users")
        .with_common_fields()
        .with_field(FieldDescriptor::text("first_name", "firstName"))
        .with_field(FieldDescriptor::text("last_name", "lastName"))
        // The backend rejects partial updates without a user name.
        .with_field(FieldDescriptor::text("user_name", "userName").always_send())
        .with_field(FieldDescriptor::text("email", "email"))
        .with_field(FieldDescriptor::enumeration("gender", "gender"))
        .with_field(FieldDescriptor::datetime("date_of_birth", "dateOfBirth"))
        .with_field(FieldDescriptor::reference(PICTURE_ID, "profilePictureID"))
        .with_field(FieldDescriptor::url(PICTURE_URL, "profilePictureUrl"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserGender {
    #[default]
    Unknown,
    Male,
    Female,
}

/// A user profile.
///
/// The profile picture is stored as two fields (picture id and signed URL)
/// and exposed as a [`Picture`], rebuilt whenever either field changes.
#[derive(Debug, Clone)]
pub struct User {
    entity: Entity,
    profile_picture: DerivedRef<Picture>,
}

impl User {
    pub fn first_name(&self) -> Option<String> {
        self.entity.get_as("first_name")
    }

    pub fn set_first_name(&mut self, name: Option<&str>) {
        self.entity.set("first_name", name);
    }

    pub fn last_name(&self) -> Option<String> {
        self.entity.get_as("last_name")
    }

    pub fn set_last_name(&mut self, name: Option<&str>) {
        self.entity.set("last_name", name);
    }

    pub fn user_name(&self) -> Option<String> {
        self.entity.get_as("user_name")
    }

    pub fn set_user_name(&mut self, user_name: &str) {
        self.entity.set("user_name", user_name);
    }

    pub fn email(&self) -> Option<String> {
        self.entity.get_as("email")
    }

    pub fn set_email(&mut self, email: Option<&str>) {
        self.entity.set("email", email);
    }

    pub fn gender(&self) -> Option<UserGender> {
        self.entity.get_as("gender")
    }

    pub fn set_gender(&mut self, gender: Option<UserGender>) {
        self.entity.set("gender", gender);
    }

    pub fn date_of_birth(&self) -> Option<DateTime<Utc>> {
        self.entity.get_as("date_of_birth")
    }

    pub fn set_date_of_birth(&mut self, date_of_birth: Option<DateTime<Utc>>) {
        self.entity.set("date_of_birth", date_of_birth);
    }

    /// Whole years since the date of birth.
    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }

    /// Whole years between the date of birth and `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        today.years_since(self.date_of_birth()?.date_naive())
    }

    pub fn profile_picture_id(&self) -> Option<EntityId> {
        self.entity.get_as(PICTURE_ID)
    }

    pub fn profile_picture_url(&self) -> Option<String> {
        self.entity.get_as(PICTURE_URL)
    }

    /// The profile picture, rebuilt if its id or URL changed since last read.
    pub fn profile_picture(&mut self) -> Option<&mut Picture> {
        let client = Arc::clone(self.entity.client());
        self.profile_picture
            .get_or_rebuild(self.entity.fields(), |id, url| {
                let id = EntityId::parse(id.as_str()?).ok()?;
                let url = url.and_then(Value::as_str).map(str::to_string);
                Some(Picture::reference(client, id, url))
            })
    }

    /// Points the profile at `picture`, or clears it. The picture must
    /// already exist on the server; saving with an unsaved picture fails
    /// validation.
    pub fn set_profile_picture(&mut self, picture: Option<Picture>) {
        self.profile_picture.set(self.entity.fields_mut(), picture);
    }

    /// Points the profile at the picture with `id`; its URL is unknown until fetched.
    pub fn set_profile_picture_id(&mut self, id: Option<EntityId>) {
        let client = Arc::clone(self.entity.client());
        self.set_profile_picture(id.map(|id| Picture::reference(client, id, None)));
    }

    /// Uploads a picture and makes it the profile picture. The user itself
    /// is not saved.
    pub async fn add_profile_picture(
        &mut self,
        caption: Option<&str>,
        data: Vec<u8>,
        content_type: &str,
        options: &CreateOptions,
    ) -> ApiResult<Picture> {
        let pictures = PictureCollection::new(Arc::clone(self.entity.client()));
        let picture = pictures.add(caption, data, content_type, options).await?;
        debug!(
            "Profile picture set to {}",
            picture.id().map(EntityId::as_str).unwrap_or_default()
        );
        self.set_profile_picture(Some(picture.clone()));
        Ok(picture)
    }
}

#[async_trait]
impl Resource for User {
    fn schema() -> &'static EntitySchema {
        &SCHEMA
    }

    fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            profile_picture: DerivedRef::new(PICTURE_ID, PICTURE_URL),
        }
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn validate(&self) -> ApiResult<()> {
        match self.profile_picture.peek() {
            Some(picture) if picture.id().is_none() => Err(ApiError::validation(
                "profile picture must be saved before it is assigned",
            )),
            _ => Ok(()),
        }
    }

    async fn after_fetch(&mut self) -> ApiResult<()> {
        match self.profile_picture() {
            Some(picture) => picture.fetch().await.map(|_| ()),
            None => Ok(()),
        }
    }

    async fn save_dependents(&mut self) -> ApiResult<()> {
        match self.profile_picture() {
            Some(picture) => picture.save().await.map(|_| ()),
            None => Ok(()),
        }
    }
}
