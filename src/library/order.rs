use std::collections::HashMap;
use std::path::Path;

use crate::config::DirOrder;

use super::model::{DirStep, EntryKind, PlayEntry, PlayList, SourceTree};

enum Visit<'t> {
    Enter(&'t Path, Vec<DirStep>),
    Files(&'t Path, Vec<DirStep>),
}

/// Linearizes a [`SourceTree`] into one [`PlayList`].
///
/// Traversal is depth-first with an explicit stack. Directories whose
/// whole subtree holds no audio are dropped and do not take a position
/// among their siblings.
pub struct PlayOrderBuilder {
    dir_order: DirOrder,
}

impl PlayOrderBuilder {
    pub fn new(dir_order: DirOrder) -> Self {
        Self { dir_order }
    }

    pub fn build(&self, tree: &SourceTree) -> PlayList {
        let counts = subtree_counts(tree);
        let count = |dir: &Path| counts.get(dir).copied().unwrap_or(0);

        let mut entries = Vec::new();
        if count(tree.root()) == 0 {
            return PlayList::new(entries);
        }

        let mut stack = vec![Visit::Enter(tree.root(), Vec::new())];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Files(dir, lineage) => {
                    let Some(listing) = tree.listing(dir) else {
                        continue;
                    };
                    entries.extend(
                        listing
                            .files
                            .iter()
                            .filter(|f| f.kind == EntryKind::Audio)
                            .map(|f| PlayEntry {
                                entry: f.clone(),
                                lineage: lineage.clone(),
                            }),
                    );
                }
                Visit::Enter(dir, lineage) => {
                    let Some(listing) = tree.listing(dir) else {
                        continue;
                    };
                    let live: Vec<_> = listing
                        .dirs
                        .iter()
                        .filter(|d| count(d.path.as_path()) > 0)
                        .collect();
                    let siblings = live.len();

                    let mut visits: Vec<Visit<'_>> = Vec::with_capacity(siblings + 1);
                    if self.dir_order == DirOrder::FilesFirst {
                        visits.push(Visit::Files(dir, lineage.clone()));
                    }
                    for (i, child) in live.into_iter().enumerate() {
                        let mut child_lineage = lineage.clone();
                        child_lineage.push(DirStep {
                            name: child.name(),
                            position: i + 1,
                            siblings,
                        });
                        visits.push(Visit::Enter(child.path.as_path(), child_lineage));
                    }
                    if self.dir_order == DirOrder::DirsFirst {
                        visits.push(Visit::Files(dir, lineage));
                    }
                    stack.extend(visits.into_iter().rev());
                }
            }
        }

        PlayList::new(entries)
    }
}

/// Audio files per directory, counting the whole subtree.
fn subtree_counts(tree: &SourceTree) -> HashMap<&Path, usize> {
    let mut dirs: Vec<_> = tree.listings().collect();
    // Children sit deeper than their parents, so they are summed first.
    dirs.sort_by(|(_, a), (_, b)| b.depth.cmp(&a.depth));

    let mut counts: HashMap<&Path, usize> = HashMap::with_capacity(dirs.len());
    for (dir, listing) in dirs {
        let nested: usize = listing
            .dirs
            .iter()
            .map(|d| counts.get(d.path.as_path()).copied().unwrap_or(0))
            .sum();
        counts.insert(dir, listing.files.len() + nested);
    }
    counts
}
