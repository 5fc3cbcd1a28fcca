use rowan::Language;

use crate::syntax::kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CppLanguage {}

impl Language for CppLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        let raw = raw.0;
        assert!(raw <= SyntaxKind::LAST as u16);
        // SAFETY: `SyntaxKind` is `repr(u16)` with contiguous discriminants starting at zero,
        // and the assertion above bounds `raw` by the last variant.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<CppLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CppLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CppLanguage>;
