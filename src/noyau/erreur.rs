//! Erreurs du noyau.
//!
//! Une seule énumération pour tout le pipeline (jetons -> normalisation ->
//! évaluation -> format) et pour le solveur d’équations.
//! La frontière (`Session::afficher`) décide du rendu : "Error" par défaut.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErreurCalc {
    /// Expression mal formée (lexique, parenthèses, opérande manquant).
    #[error("syntaxe : {0}")]
    Syntaxe(String),

    /// Faute arithmétique à l’exécution (division par zéro, domaine, inconnu).
    #[error("évaluation : {0}")]
    Evaluation(String),

    /// Champ de coefficient / constante non numérique ou dimensions invalides.
    #[error("saisie : {0}")]
    Saisie(String),

    #[error("système singulier (pas de solution unique)")]
    MatriceSinguliere,

    /// Expression soumise alors que le menu Équation est actif.
    #[error("menu Équation actif : utiliser le solveur")]
    MenuIncompatible,
}

impl ErreurCalc {
    pub fn syntaxe(msg: impl Into<String>) -> Self {
        ErreurCalc::Syntaxe(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        ErreurCalc::Evaluation(msg.into())
    }

    pub fn saisie(msg: impl Into<String>) -> Self {
        ErreurCalc::Saisie(msg.into())
    }
}

pub type Resultat<T> = Result<T, ErreurCalc>;
