//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, affichage, erreur, champs
//! du solveur) autour d’une `Session` du noyau, et offrir des opérations
//! simples (C/CLR/AC, ordre d’équation) sans logique d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici : la vue appelle la session, l’état range le résultat.
//! - Actions déterministes, sans effet de bord caché.
//! - Ordre d’équation borné (2 à 4), champs redimensionnés en conséquence.

use calculatrice_sci::noyau::{ErreurCalc, Session};

/// Ordre par défaut du solveur (second degré / 2 inconnues).
const ORDRE_DEFAUT: usize = 2;

/// Bornes de l’ordre (degré du polynôme ou nombre d’inconnues).
pub const ORDRE_MIN: usize = 2;
pub const ORDRE_MAX: usize = 4;

/// Type d’équation proposé dans le menu Équation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeEquation {
    #[default]
    Polynome,
    Systeme,
}

impl TypeEquation {
    pub fn libelle(self) -> &'static str {
        match self {
            TypeEquation::Polynome => "Polynôme",
            TypeEquation::Systeme => "Système linéaire",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- noyau ---
    pub session: Session,

    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub affichage: String, // résultat formaté, ou "Error"
    pub erreur: String,    // détail de l’erreur (sous l’affichage)

    // --- solveur ---
    pub type_equation: TypeEquation,
    pub ordre: usize,
    pub coefficients: Vec<String>,       // ordre + 1 champs, plus haut degré en tête
    pub matrice: Vec<Vec<String>>,       // ordre × ordre
    pub second_membre: Vec<String>,      // ordre

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        let mut app = Self {
            session: Session::new(),
            entree: String::new(),
            affichage: String::new(),
            erreur: String::new(),
            type_equation: TypeEquation::default(),
            ordre: ORDRE_DEFAUT,
            coefficients: Vec::new(),
            matrice: Vec::new(),
            second_membre: Vec::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        };
        app.redimensionner_champs();
        app
    }
}

impl AppCalc {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + session + solveur).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.session.reset();
        self.type_equation = TypeEquation::default();
        self.set_ordre(ORDRE_DEFAUT);
        for champ in self
            .coefficients
            .iter_mut()
            .chain(self.matrice.iter_mut().flatten())
            .chain(self.second_membre.iter_mut())
        {
            champ.clear();
        }
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer affichage + erreur (sans toucher à l’entrée ni à Ans).
    pub fn clear_resultats(&mut self) {
        self.affichage.clear();
        self.erreur.clear();
        self.focus_entree = true;
    }

    /// Utilitaire : placer un résultat de la session (succès ou "Error" + détail).
    pub fn set_resultat(&mut self, resultat: Result<String, ErreurCalc>) {
        self.affichage = Session::afficher(&resultat);
        match resultat {
            Ok(_) => self.erreur.clear(),
            Err(e) => self.erreur = e.to_string(),
        }
        self.focus_entree = true;
    }

    /// Garde-fou : ordre borné, champs conservés autant que possible.
    pub fn set_ordre(&mut self, ordre: usize) {
        self.ordre = ordre.clamp(ORDRE_MIN, ORDRE_MAX);
        self.redimensionner_champs();
    }

    fn redimensionner_champs(&mut self) {
        let n = self.ordre;
        self.coefficients.resize(n + 1, String::new());
        self.matrice.resize(n, Vec::new());
        for ligne in self.matrice.iter_mut() {
            ligne.resize(n, String::new());
        }
        self.second_membre.resize(n, String::new());
    }
}
