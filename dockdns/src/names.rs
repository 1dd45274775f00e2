use shared::protocol::ID_PREFIX_LEN;

/// Short service name from an image reference: the last path segment with
/// its tag removed, e.g. "registry.io/org/app:1.2" -> "app"
pub fn clean_image_name(image: &str) -> &str {
    let last = image.rsplit('/').next().unwrap_or(image);
    last.split(':').next().unwrap_or(last)
}

/// Strip at most one leading "/" from a container name
pub fn remove_slash(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

/// Short container id used as the registration key
pub fn truncate_id(id: &str) -> &str {
    match id.char_indices().nth(ID_PREFIX_LEN) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}
