use super::*;
use crate::{
    error::{MSG_SAVE_ITEM_FAILED, MSG_UPLOAD_FAILED},
    images::{ImageUpload, MAX_IMAGE_BYTES},
    test_support::{category, item, FakeGalleryApi},
};
use shared::domain::GalleryStatus;

fn filled_form() -> ItemForm {
    ItemForm {
        title: "Gotong royong".to_string(),
        description: "Membersihkan saluran air".to_string(),
        image: "lama.jpg".to_string(),
        ..ItemForm::default()
    }
}

#[tokio::test]
async fn empty_title_is_rejected_before_any_request() {
    let api = FakeGalleryApi::empty();
    let mutator = AdminMutator::new(api.clone());

    let form = ItemForm {
        title: "   ".to_string(),
        ..filled_form()
    };
    let err = mutator.create(&form).await.expect_err("title is required");
    assert!(matches!(err, ClientError::Validation(ValidationError::MissingTitle)));
    assert_eq!(err.user_message(MSG_SAVE_ITEM_FAILED), "Judul harus diisi");
    assert_eq!(api.total_calls(), 0);

    let err = mutator
        .update(GalleryItemId(1), &form)
        .await
        .expect_err("title is required");
    assert!(err.is_validation());
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn missing_image_is_rejected_before_any_request() {
    let api = FakeGalleryApi::empty();
    let mutator = AdminMutator::new(api.clone());

    let mut form = filled_form();
    form.remove_image();
    let err = mutator.create(&form).await.expect_err("image is required");
    assert!(matches!(err, ClientError::Validation(ValidationError::MissingImage)));
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn oversized_or_non_image_files_never_reach_the_server() {
    let api = FakeGalleryApi::empty();
    let mutator = AdminMutator::new(api.clone());

    let mut form = filled_form();
    form.select_image(ImageUpload::new("besar.jpg", vec![0; MAX_IMAGE_BYTES + 1]));
    let err = mutator.create(&form).await.expect_err("file too large");
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::ImageTooLarge { .. })
    ));

    form.select_image(ImageUpload::new("catatan.txt", b"halo".to_vec()));
    let err = mutator.create(&form).await.expect_err("not an image");
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::UnsupportedImageType { .. })
    ));
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn create_uploads_first_and_stores_returned_filename() {
    let api = FakeGalleryApi::empty();
    let mutator = AdminMutator::new(api.clone());

    let mut form = filled_form();
    form.select_image(ImageUpload::new("panen.png", vec![1, 2, 3]));
    let created = mutator.create(&form).await.expect("create succeeds");

    assert_eq!(api.calls(), vec!["upload_image", "create_item"]);
    assert_eq!(api.uploads(), vec![("panen.png".to_string(), None)]);
    let expected = "gallery-1700000000000-panen.png";
    assert_eq!(created.image.as_deref(), Some(expected));
    assert_eq!(api.created()[0].image.as_deref(), Some(expected));
    assert_eq!(api.created()[0].category, "kegiatan");
    assert_eq!(api.created()[0].status, GalleryStatus::Active);
}

#[tokio::test]
async fn update_upload_carries_the_item_id() {
    let api = FakeGalleryApi::new(
        vec![item(7, "Lama", "kegiatan", GalleryStatus::Active)],
        Vec::new(),
    );
    let mutator = AdminMutator::new(api.clone());

    let mut form = filled_form();
    form.select_image(ImageUpload::new("baru.jpg", vec![9]));
    mutator
        .update(GalleryItemId(7), &form)
        .await
        .expect("update succeeds");

    assert_eq!(api.uploads()[0].1, Some(GalleryItemId(7)));
    let (id, payload) = &api.updates()[0];
    assert_eq!(*id, GalleryItemId(7));
    assert_eq!(payload.title, "Gotong royong");
    assert_eq!(payload.image.as_deref(), Some("gallery-1700000000000-baru.jpg"));
}

#[tokio::test]
async fn failed_upload_prevents_the_write() {
    let api = FakeGalleryApi::empty();
    api.fail("upload_image", 500, Some("disk full"));
    let mutator = AdminMutator::new(api.clone());

    let mut form = filled_form();
    form.select_image(ImageUpload::new("panen.jpg", vec![1]));
    let err = mutator.create(&form).await.expect_err("upload fails");

    assert!(matches!(err, ClientError::Upload { .. }));
    assert_eq!(err.user_message(MSG_SAVE_ITEM_FAILED), MSG_UPLOAD_FAILED);
    assert_eq!(api.calls_to("create_item"), 0);
    assert!(api.stored_items().is_empty());
}

#[tokio::test]
async fn toggle_sends_loaded_copy_with_flipped_status() {
    let loaded = item(3, "Festival budaya", "wisata", GalleryStatus::Active);
    let api = FakeGalleryApi::new(vec![loaded.clone()], Vec::new());
    // Someone else renamed it after our list was loaded.
    let mut remote = loaded.clone();
    remote.title = "Festival budaya 2024".to_string();
    api.set_item(remote);

    let mutator = AdminMutator::new(api.clone());
    mutator
        .toggle_status(GalleryItemId(3), std::slice::from_ref(&loaded))
        .await
        .expect("toggle succeeds");

    assert_eq!(api.calls(), vec!["update_item"]);
    let (id, payload) = &api.updates()[0];
    assert_eq!(*id, GalleryItemId(3));
    assert_eq!(payload.status, GalleryStatus::Inactive);
    assert_eq!(payload.title, loaded.title);
    assert_eq!(payload.description, loaded.description);
    assert_eq!(payload.category, loaded.category);
    assert_eq!(payload.image, loaded.image);
}

#[tokio::test]
async fn toggle_of_unknown_item_issues_no_request() {
    let api = FakeGalleryApi::empty();
    let mutator = AdminMutator::new(api.clone());

    let err = mutator
        .toggle_status(GalleryItemId(99), &[])
        .await
        .expect_err("item is not loaded");
    assert!(matches!(err, ClientError::NotLoaded { id } if id == GalleryItemId(99)));
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn category_label_is_required() {
    let api = FakeGalleryApi::empty();
    let mutator = AdminMutator::new(api.clone());

    let err = mutator
        .create_category(&CategoryForm::default())
        .await
        .expect_err("label is required");
    assert!(matches!(err, ClientError::Validation(ValidationError::MissingLabel)));
    assert_eq!(err.user_message("x"), "Nama kategori (label) harus diisi");
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn category_conflict_surfaces_server_message() {
    let api = FakeGalleryApi::new(Vec::new(), vec![category(1, "kegiatan", "Kegiatan")]);
    api.fail(
        "delete_category",
        409,
        Some("Kategori masih digunakan oleh 1 item galeri"),
    );
    let mutator = AdminMutator::new(api.clone());

    let err = mutator
        .delete_category(GalleryCategoryId(1))
        .await
        .expect_err("category is referenced");
    assert!(err.is_conflict());
    assert_eq!(
        err.user_message("Gagal menghapus kategori"),
        "Kategori masih digunakan oleh 1 item galeri"
    );
    assert_eq!(api.stored_categories().len(), 1);
}

#[tokio::test]
async fn api_error_without_message_uses_fallback() {
    let api = FakeGalleryApi::new(
        vec![item(1, "A", "kegiatan", GalleryStatus::Active)],
        Vec::new(),
    );
    api.fail("delete_item", 500, None);
    let mutator = AdminMutator::new(api.clone());

    let err = mutator
        .delete(GalleryItemId(1))
        .await
        .expect_err("server error");
    assert_eq!(err.user_message("Gagal menghapus item galeri"), "Gagal menghapus item galeri");
}
