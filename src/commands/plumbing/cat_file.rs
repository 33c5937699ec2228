use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Pretty-print an object given by full id or by revision.
    pub fn cat_file(&mut self, object: &str) -> anyhow::Result<()> {
        let oid = match ObjectId::try_parse(object.to_string()) {
            Ok(oid) => oid,
            Err(_) => self.resolve_revision(object)?,
        };

        let content = self.database().load(&oid)?.display();
        write!(self.writer(), "{content}")?;

        Ok(())
    }
}
