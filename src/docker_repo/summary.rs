// Project Docker list entries onto ContainerInfo.

use crate::models::ContainerInfo;
use bollard::models::ContainerSummary;

const SHORT_ID_LEN: usize = 12;

pub(crate) fn container_info(c: &ContainerSummary) -> ContainerInfo {
    let first_name = c
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(String::as_str)
        .unwrap_or_default();
    let state = c.state.as_ref().map(|s| s.to_string()).unwrap_or_default();
    project(
        c.id.as_deref().unwrap_or_default(),
        first_name,
        &state,
        c.status.as_deref().unwrap_or_default(),
        c.image.as_deref().unwrap_or_default(),
    )
}

/// Name is kept verbatim, including Docker's leading `/`.
fn project(id: &str, name: &str, state: &str, status: &str, image: &str) -> ContainerInfo {
    ContainerInfo {
        id: id.chars().take(SHORT_ID_LEN).collect(),
        name: name.to_string(),
        state: state.to_string(),
        status: status.to_string(),
        image: image.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_id_and_keeps_name_verbatim() {
        let info = project(
            "4f1c0b6a9e2d7c3b5a8f0e1d2c3b4a5f",
            "/nginx",
            "running",
            "Up 3 hours",
            "nginx:1.27",
        );
        assert_eq!(info.id, "4f1c0b6a9e2d");
        assert_eq!(info.name, "/nginx");
        assert!(info.is_running());
    }

    #[test]
    fn short_ids_are_not_padded() {
        let info = project("abc", "", "exited", "Exited (0)", "busybox");
        assert_eq!(info.id, "abc");
        assert!(!info.is_running());
    }

    #[test]
    fn empty_summary_projects_to_empty_fields() {
        let info = container_info(&ContainerSummary::default());
        assert_eq!(info, ContainerInfo::default());
    }
}
