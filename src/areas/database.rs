use crate::artifacts::database::database_entry::FlatTree;
use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Content-addressed object store under `objects/`.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn tree_diff(
        &self,
        old_oid: Option<&ObjectId>,
        new_oid: Option<&ObjectId>,
    ) -> anyhow::Result<TreeDiff<'_>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_oids(old_oid, new_oid, Path::new(""))?;
        Ok(tree_diff)
    }

    /// Store an object unless an object with the same id is already present.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let content = object.serialize()?;
        let oid = ObjectId::of_bytes(&content);
        let object_path = self.path.join(oid.to_path());

        if object_path.exists() {
            trace!(%oid, "object already stored");
            return Ok(oid);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, content)?;
        debug!(%oid, object_type = %object.object_type(), "object stored");

        Ok(oid)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.to_path()).exists()
    }

    /// Read, inflate and verify an object before parsing it.
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        let raw = self.read_object(oid)?;

        let actual = ObjectId::of_bytes(&raw);
        if &actual != oid {
            return Err(RepositoryError::CorruptObject {
                expected: oid.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }

        Self::parse_object(raw)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        match self.load(oid)? {
            ObjectBox::Blob(blob) => Ok(*blob),
            other => anyhow::bail!("object {oid} is a {}, not a blob", other.object_type()),
        }
    }

    pub fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        match self.load(oid)? {
            ObjectBox::Commit(commit) => Ok(*commit),
            other => Err(RepositoryError::NotACommit {
                oid: oid.to_short_oid(),
                object_type: other.object_type().to_string(),
            }
            .into()),
        }
    }

    /// Load a tree, peeling a commit to the tree it points at.
    pub fn load_tree(&self, oid: &ObjectId) -> anyhow::Result<Tree> {
        match self.load(oid)? {
            ObjectBox::Tree(tree) => Ok(*tree),
            ObjectBox::Commit(commit) => self.load_tree(commit.tree_oid()),
            ObjectBox::Blob(_) => anyhow::bail!("object {oid} is a blob, not a tree"),
        }
    }

    /// Every object whose id starts with `prefix`. Only the prefix's bucket is scanned.
    pub fn load_prefix(&self, prefix: &str) -> anyhow::Result<Vec<(ObjectId, ObjectBox)>> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.len() < 2 {
            anyhow::bail!("object prefix '{prefix}' is too short");
        }

        let (bucket, rest) = prefix.split_at(2);
        let bucket_path = self.path.join(bucket);
        if !bucket_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut oids = std::fs::read_dir(&bucket_path)
            .with_context(|| format!("Unable to list {}", bucket_path.display()))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(rest) && !name.starts_with("tmp-obj-"))
            .filter_map(|name| ObjectId::try_parse(format!("{bucket}{name}")).ok())
            .collect::<Vec<_>>();
        oids.sort();

        oids.into_iter()
            .map(|oid| {
                let object = self.load(&oid)?;
                Ok((oid, object))
            })
            .collect()
    }

    /// Flatten a commit or tree into path -> blob entry. `None` is the empty tree.
    pub fn flatten_tree(&self, oid: Option<&ObjectId>) -> anyhow::Result<FlatTree> {
        let mut flat = FlatTree::new();
        if let Some(oid) = oid {
            self.collect_blobs(&self.load_tree(oid)?, Path::new(""), &mut flat)?;
        }

        Ok(flat)
    }

    fn collect_blobs(&self, tree: &Tree, prefix: &Path, flat: &mut FlatTree) -> anyhow::Result<()> {
        for (name, entry) in tree.entries() {
            let path = prefix.join(name);
            match entry {
                TreeEntry::File(entry) => {
                    flat.insert(path, entry.clone());
                }
                TreeEntry::LazyDirectory(entry) => {
                    self.collect_blobs(&self.load_tree(&entry.oid)?, &path, flat)?;
                }
                TreeEntry::Directory(subtree) => {
                    self.collect_blobs(subtree, &path, flat)?;
                }
            }
        }

        Ok(())
    }

    fn parse_object(raw: Bytes) -> anyhow::Result<ObjectBox> {
        let total = raw.len();
        let mut reader = Cursor::new(raw);
        let (object_type, size) = ObjectType::parse_header(&mut reader)?;

        let payload_size = total - reader.position() as usize;
        if payload_size != size {
            return Err(RepositoryError::MalformedObject(format!(
                "{object_type} header declares {size} bytes but {payload_size} follow"
            ))
            .into());
        }

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(reader)?))),
        }
    }

    fn read_object(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(oid.to_path());

        let compressed = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::ObjectNotFound(oid.to_string()).into());
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("Unable to read object file {}", object_path.display())
                });
            }
        };

        Self::decompress(&compressed).with_context(|| format!("Unable to inflate object {oid}"))
    }

    fn write_object(&self, object_path: &Path, content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        let temp_path: PathBuf = object_dir.join(Self::generate_temp_name());

        let compressed = Self::compress(&content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("Unable to open object file {}", temp_path.display()))?;
        file.write_all(&compressed)
            .with_context(|| format!("Unable to write object file {}", temp_path.display()))?;
        drop(file);

        // the rename is what makes the object visible
        std::fs::rename(&temp_path, object_path).with_context(|| {
            format!("Unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut content = Vec::new();
        decoder.read_to_end(&mut content).map_err(|error| {
            RepositoryError::MalformedObject(format!("zlib stream is invalid: {error}"))
        })?;

        Ok(content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
