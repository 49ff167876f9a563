// src/noyau/expr.rs
//
// AST numérique (flottant / complexe).
// - Litteral  : nombre réel ou imaginaire pur (déjà lu par jetons.rs)
// - Constante : π, Ans
// - Unaire    : moins unaire
// - Binaire   : + - * / ^
// - Appel     : fonction d’une variable (déjà canonisée par normalise.rs)
//
// L’AST ne porte aucune valeur d’environnement : Ans est résolu par eval.rs.

use num_complex::Complex64;

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constante {
    Pi,
    Ans,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Deg2Rad,
    Log10,
    Sqrt,
}

impl Fonction {
    /// Nom reconnu -> fonction. "log" est accepté comme log10 (saisie à la main
    /// d’une forme canonique).
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        match nom {
            "sin" => Some(Fonction::Sin),
            "cos" => Some(Fonction::Cos),
            "tan" => Some(Fonction::Tan),
            "deg2rad" => Some(Fonction::Deg2Rad),
            "log10" | "log" => Some(Fonction::Log10),
            "sqrt" => Some(Fonction::Sqrt),
            _ => None,
        }
    }

    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Deg2Rad => "deg2rad",
            Fonction::Log10 => "log10",
            Fonction::Sqrt => "sqrt",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Litteral(Complex64),
    Constante(Constante),
    Neg(Box<Expr>),
    Binaire(OpBinaire, Box<Expr>, Box<Expr>),
    Appel(Fonction, Box<Expr>),
}

impl Expr {
    pub fn binaire(op: OpBinaire, a: Expr, b: Expr) -> Expr {
        Expr::Binaire(op, Box::new(a), Box::new(b))
    }

    /// Vrai si l’arbre référence Ans (utile pour la démarche / le journal).
    pub fn utilise_ans(&self) -> bool {
        match self {
            Expr::Constante(Constante::Ans) => true,
            Expr::Litteral(_) | Expr::Constante(_) => false,
            Expr::Neg(x) | Expr::Appel(_, x) => x.utilise_ans(),
            Expr::Binaire(_, a, b) => a.utilise_ans() || b.utilise_ans(),
        }
    }
}

/// Affichage entièrement parenthésé (démarche : montre comment l’entrée a été lue).
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Litteral(z) if z.im == 0.0 => write!(f, "{}", z.re),
            Expr::Litteral(z) if z.re == 0.0 => write!(f, "{}i", z.im),
            Expr::Litteral(z) => write!(f, "({z})"),
            Expr::Constante(Constante::Pi) => write!(f, "π"),
            Expr::Constante(Constante::Ans) => write!(f, "Ans"),
            Expr::Neg(x) => write!(f, "-{x}"),
            Expr::Binaire(op, a, b) => {
                let s = match op {
                    OpBinaire::Add => "+",
                    OpBinaire::Sub => "-",
                    OpBinaire::Mul => "*",
                    OpBinaire::Div => "/",
                    OpBinaire::Pow => "^",
                };
                write!(f, "({a}{s}{b})")
            }
            Expr::Appel(g, x) => write!(f, "{}({x})", g.nom()),
        }
    }
}
