//! Static category tree for the list page's filter sidebar.
//!
//! The tree is fixed at build time. Documents are matched to categories by
//! substring containment of the category's display name inside the
//! document's free-text type field. That loose coupling is intentional and
//! load-bearing: the type vocabulary and the tree overlap but are not a
//! strict foreign key.

/// One node of the filter tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub children: &'static [Category],
}

impl Category {
    /// All descendants, depth-first (not including `self`).
    pub fn descendants(&self) -> Vec<&'static Category> {
        let mut out = Vec::new();
        let mut stack: Vec<&'static Category> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Top-level match rule: the document's type contains this category's
    /// name or the name of any descendant.
    pub fn matches_type(&self, doc_type: &str) -> bool {
        if doc_type.contains(self.name) {
            return true;
        }
        self.descendants()
            .iter()
            .any(|sub| doc_type.contains(sub.name))
    }
}

/// The fixed filter tree.
pub fn categories() -> &'static [Category] {
    CATEGORIES
}

/// Find a node anywhere in the tree by id.
pub fn find_category(id: &str) -> Option<&'static Category> {
    fn walk(nodes: &'static [Category], id: &str) -> Option<&'static Category> {
        for node in nodes {
            if node.id == id {
                return Some(node);
            }
            if let Some(found) = walk(node.children, id) {
                return Some(found);
            }
        }
        None
    }
    walk(CATEGORIES, id)
}

static CATEGORIES: &[Category] = &[
    Category {
        id: "maker",
        name: "メーカー発信文書",
        children: &[
            Category {
                id: "maker-tech",
                name: "技術情報",
                children: &[
                    Category { id: "maker-tech-hard", name: "ハードウェア", children: &[] },
                    Category { id: "maker-tech-soft", name: "ソフトウェア", children: &[] },
                    Category { id: "maker-tech-network", name: "ネットワーク", children: &[] },
                ],
            },
            Category {
                id: "maker-product",
                name: "製品情報",
                children: &[
                    Category { id: "maker-product-new", name: "新製品", children: &[] },
                    Category { id: "maker-product-update", name: "アップデート", children: &[] },
                ],
            },
            Category { id: "maker-service", name: "サービス情報", children: &[] },
            Category { id: "maker-maintenance", name: "メンテナンス情報", children: &[] },
        ],
    },
    Category {
        id: "internal",
        name: "社内文書",
        children: &[
            Category { id: "internal-notice", name: "通達", children: &[] },
            Category { id: "internal-rules", name: "規定", children: &[] },
            Category { id: "internal-announce", name: "お知らせ", children: &[] },
            Category { id: "internal-report", name: "報告書", children: &[] },
        ],
    },
    Category {
        id: "external",
        name: "外部文書",
        children: &[
            Category { id: "external-partner", name: "取引先文書", children: &[] },
            Category { id: "external-govt", name: "官公庁文書", children: &[] },
        ],
    },
    Category {
        id: "manual",
        name: "マニュアル",
        children: &[
            Category { id: "manual-operation", name: "操作マニュアル", children: &[] },
            Category { id: "manual-maintenance", name: "保守マニュアル", children: &[] },
            Category { id: "manual-training", name: "研修資料", children: &[] },
        ],
    },
    Category {
        id: "meeting",
        name: "会議資料",
        children: &[
            Category { id: "meeting-board", name: "取締役会", children: &[] },
            Category { id: "meeting-dept", name: "部門会議", children: &[] },
            Category { id: "meeting-project", name: "プロジェクト会議", children: &[] },
        ],
    },
    Category {
        id: "hr",
        name: "人事関連",
        children: &[
            Category { id: "hr-recruitment", name: "採用情報", children: &[] },
            Category { id: "hr-evaluation", name: "評価制度", children: &[] },
            Category { id: "hr-training", name: "研修制度", children: &[] },
        ],
    },
    Category {
        id: "finance",
        name: "経理関連",
        children: &[
            Category { id: "finance-expense", name: "経費精算", children: &[] },
            Category { id: "finance-budget", name: "予算管理", children: &[] },
        ],
    },
];

/// The registration form's fixed type vocabulary (select options).
pub const DOCUMENT_TYPES: &[&str] = &[
    "通達",
    "連絡",
    "製品情報",
    "技術情報",
    "規定",
    "お知らせ",
    "報告書",
    "マニュアル",
    "会議資料",
    "その他",
];
