//! Page-level concatenation of PDF documents with lopdf.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::{debug, trace};

use super::Result;
use crate::error::PdfError;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Accumulates the pages of several PDFs into one document.
pub struct PdfMerger {
    document: Document,
    pages: Vec<ObjectId>,
    next_id: u32,
}

impl PdfMerger {
    /// Create an empty merger.
    pub fn new() -> Self {
        Self {
            document: Document::with_version("1.5"),
            pages: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append every page of the PDF at `path`, returning the page count.
    ///
    /// On error nothing from the file is kept.
    pub fn append_file(&mut self, path: &Path) -> Result<usize> {
        let doc = Document::load(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        self.append_document(doc)
    }

    /// Append every page of an already loaded document.
    pub fn append_document(&mut self, mut doc: Document) -> Result<usize> {
        if doc.is_encrypted() && doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        doc.renumber_objects_with(self.next_id);
        self.next_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        // Pages get a new parent, so inherited attributes must move onto them
        for page_id in &page_ids {
            let inherited = inherited_attributes(&doc, *page_id);
            if let Ok(Object::Dictionary(page)) = doc.get_object_mut(*page_id) {
                for (key, value) in inherited {
                    if !page.has(&key) {
                        page.set(key, value);
                    }
                }
            }
        }

        for (id, object) in doc.objects {
            match type_name(&object) {
                Some(b"Catalog") | Some(b"Pages") | Some(b"Outlines") | Some(b"Outline") => {
                    trace!("Dropping {:?} from source document", id);
                }
                _ => {
                    self.document.objects.insert(id, object);
                }
            }
        }

        let count = page_ids.len();
        self.pages.extend(page_ids);
        debug!("Appended {} pages, merged document now has {}", count, self.pages.len());
        Ok(count)
    }

    /// Build the page tree and serialize the merged document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        self.document.max_id = self.next_id;
        let pages_id = self.document.new_object_id();

        for page_id in &self.pages {
            if let Ok(Object::Dictionary(page)) = self.document.get_object_mut(*page_id) {
                page.set("Parent", pages_id);
            }
        }

        let kids: Vec<Object> = self.pages.iter().map(|id| Object::Reference(*id)).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.compress();

        let mut data = Vec::new();
        self.document
            .save_to(&mut data)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(data)
    }
}

impl Default for PdfMerger {
    fn default() -> Self {
        Self::new()
    }
}

fn type_name(object: &Object) -> Option<&[u8]> {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return None,
    };
    dict.get(b"Type").ok()?.as_name().ok()
}

/// Collect inheritable attributes from the page's ancestors, nearest first.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut node = parent_of(doc, page_id);
    let mut depth = 0;

    while let Some(node_id) = node {
        // Guard against cyclic page trees
        if depth > 64 {
            break;
        }
        depth += 1;

        let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = dict.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        node = parent_ref(dict);
    }

    found
}

fn parent_of(doc: &Document, id: ObjectId) -> Option<ObjectId> {
    match doc.get_object(id) {
        Ok(Object::Dictionary(dict)) => parent_ref(dict),
        _ => None,
    }
}

fn parent_ref(dict: &Dictionary) -> Option<ObjectId> {
    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => Some(*parent_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_count, page_texts, sample_pdf};
    use std::fs;

    #[test]
    fn test_merges_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        fs::write(&a, sample_pdf(&["Alpha", "Beta"])).unwrap();
        fs::write(&b, sample_pdf(&["Gamma"])).unwrap();

        let mut merger = PdfMerger::new();
        assert_eq!(merger.append_file(&a).unwrap(), 2);
        assert_eq!(merger.append_file(&b).unwrap(), 1);
        assert_eq!(merger.page_count(), 3);

        let out = dir.path().join("merged.pdf");
        fs::write(&out, merger.finish().unwrap()).unwrap();

        assert_eq!(page_count(&out), 3);
        assert_eq!(page_texts(&out), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_pages_keep_inherited_attributes() {
        let doc = Document::load_mem(&sample_pdf(&["Alpha"])).unwrap();
        let mut merger = PdfMerger::new();
        merger.append_document(doc).unwrap();

        let page_id = merger.pages[0];
        let Ok(Object::Dictionary(page)) = merger.document.get_object(page_id) else {
            panic!("page is not a dictionary");
        };
        assert!(page.has(b"Resources"));
        assert!(page.has(b"MediaBox"));
    }

    #[test]
    fn test_failed_source_leaves_merge_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdf");
        let bad = dir.path().join("bad.pdf");
        fs::write(&good, sample_pdf(&["Alpha"])).unwrap();
        fs::write(&bad, b"garbage").unwrap();

        let mut merger = PdfMerger::new();
        assert!(merger.append_file(&bad).is_err());
        merger.append_file(&good).unwrap();
        assert_eq!(merger.page_count(), 1);
    }

    #[test]
    fn test_empty_merge_cannot_finish() {
        assert!(matches!(PdfMerger::new().finish(), Err(PdfError::NoPages)));
    }
}
