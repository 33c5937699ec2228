mod cached_diff;
mod revision_diff;
mod workspace_diff;
