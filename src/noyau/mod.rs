//! Noyau de la calculatrice scientifique
//!
//! Organisation interne :
//! - erreur.rs     : ErreurCalc (thiserror) + alias Resultat
//! - jetons.rs     : tokenisation (saisie brute et forme canonique)
//! - normalise.rs  : saisie -> forme canonique (appels, degrés, log10, auto-fermeture)
//! - polaire.rs    : littéral r∠φ -> complexe
//! - rpn.rs        : shunting-yard + construction Expr
//! - expr.rs       : AST (littéral, constante, unaire, binaire, appel)
//! - eval.rs       : interprétation réelle ou complexe
//! - rationnel.rs  : fractions continues, rationnels et racines “jolis”
//! - format.rs     : affichage (entier, p/q, k√m/d, décimal, a+bi, r∠φ)
//! - equations.rs  : polynômes (degré 2 à 4) + systèmes linéaires
//! - session.rs    : modes, Ans, opérations de la frontière

pub mod equations;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod normalise;
pub mod polaire;
pub mod rationnel;
pub mod rpn;
pub mod session;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use equations::{solve_linear_system, solve_polynomial};
pub use erreur::{ErreurCalc, Resultat};
pub use eval::{evaluate, Domaine};
pub use format::format;
pub use normalise::normalize;
pub use polaire::resolve_polar;
pub use session::{AngleMode, Demarche, Menu, ModeComplexe, ModeNumerique, Session};
