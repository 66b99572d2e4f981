use lazy_static::lazy_static;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use std::collections::HashMap;
use syn::{
    parse2, Attribute, DeriveInput, Field, GenericArgument, Ident, Lit, LitInt, Meta,
    MetaNameValue, Type, TypePath,
};

lazy_static! {
    static ref SQL_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("bool", "INTEGER");
        m.insert("String", "TEXT");
        m.insert("i64", "INTEGER");
        m.insert("i32", "INTEGER");
        m.insert("i16", "INTEGER");
        m.insert("i8", "INTEGER");
        m.insert("f64", "REAL");
        m.insert("f32", "REAL");
        m
    };
}

/// A macro for deriving an implementation of `CatalogTable` for a record struct
///
/// The table_name attribute controls the name of the SQLite table that instances of this struct
/// are written to and read from. When it is absent the struct name is used.
///
/// Columns are mapped from the field types: integers become INTEGER, floats REAL and strings TEXT.
/// An `Option` makes the column nullable. Any other type must carry a `sql_type` attribute naming
/// the column type, and must implement `ToSql` and `FromSql` itself.
///
/// An "object_id" primary key column is created for every table and is not part of the struct.
/// # Usage
/// ```ignore
/// #[derive(CatalogTable)]
/// #[table_name = "datum"]
/// struct DatumRecord {
///     code: i64,
///     name: String,
///     #[sql_type = "TEXT"]
///     ellipsoid: CrsRef,
///     prime_meridian_value: Option<f64>,
/// }
/// ```
#[proc_macro_derive(CatalogTable, attributes(table_name, sql_type))]
pub fn derive_catalog_table(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let inner_input = proc_macro2::TokenStream::from(input);
    proc_macro::TokenStream::from(derive_catalog_table_inner(inner_input))
}

fn derive_catalog_table_inner(input: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    let ast = parse2::<DeriveInput>(input).unwrap();

    let tbl_name = get_meta_str(&ast.attrs, "table_name");
    let name = &ast.ident;

    let fields = match &ast.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => fields.named.iter(),
            _ => panic!("CatalogTable derive expected named fields"),
        },
        _ => panic!("CatalogTable derive expected a struct"),
    }
    .collect();

    impl_table(name, &fields, tbl_name)
}

fn get_meta_attr(attrs: &[Attribute], name: &str) -> Option<Meta> {
    let mut temp = attrs
        .iter()
        .filter_map(|attr| attr.parse_meta().ok())
        .filter(|i| match i.path().get_ident() {
            Some(i) => *i == name,
            None => false,
        })
        .collect::<Vec<Meta>>();
    temp.pop()
}

fn get_meta_str(attrs: &[Attribute], name: &str) -> Option<String> {
    get_meta_attr(attrs, name).and_then(|meta| match meta {
        Meta::NameValue(MetaNameValue {
            lit: Lit::Str(ls), ..
        }) => Some(ls.value()),
        _ => panic!("The {} attribute expects a string value", name),
    })
}

#[derive(Debug)]
struct FieldInfo {
    name: String,
    optional: bool,
    type_for_sql: String,
}

// return the type name and whether or not it's optional
fn get_path_type_name(p: &TypePath) -> (String, bool) {
    assert!(!p.path.segments.is_empty());
    let final_segment = p.path.segments.last().unwrap();
    let id_string = final_segment.ident.to_string();
    if id_string == "Option" {
        if let syn::PathArguments::AngleBracketed(a) = &final_segment.arguments {
            assert!(a.args.len() == 1, "Only one argument allowed in an Option");
            if let GenericArgument::Type(Type::Path(p)) = &a.args[0] {
                return (get_path_type_name(p).0, true);
            }
        }
        panic!("Unsupported use of the option type");
    }
    (id_string, false)
}

fn impl_table(name: &Ident, fields: &Vec<&Field>, tbl_name: Option<String>) -> TokenStream {
    let table_name = match tbl_name {
        Some(n) => n,
        None => name.to_string(),
    };

    let field_infos: Vec<FieldInfo> = fields
        .iter()
        .map(|f| {
            let field_name = f.ident.as_ref().expect("Expected named field").to_string();
            let (type_name, optional) = match &f.ty {
                syn::Type::Path(tp) => get_path_type_name(tp),
                _ => panic!("Don't know how to map to a SQL type {:?}", f.ty),
            };
            let type_for_sql = match get_meta_str(&f.attrs, "sql_type") {
                Some(explicit) => explicit,
                None => match SQL_TYPES.get(type_name.as_str()) {
                    Some(t) => t.to_string(),
                    None if type_name.starts_with('u') => {
                        panic!("SQLite doesn't support unsigned integers, use a signed integer value")
                    }
                    None => panic!(
                        "Don't know how to map to SQL type {}, add a sql_type attribute",
                        type_name
                    ),
                },
            };
            FieldInfo {
                name: field_name,
                optional,
                type_for_sql,
            }
        })
        .collect();

    let column_defs = field_infos
        .iter()
        .map(|f| {
            let null_str = if f.optional { "" } else { " NOT NULL" };
            format!("{} {}{}", f.name, f.type_for_sql, null_str)
        })
        .collect::<Vec<String>>();
    let column_list = field_infos
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<&str>>()
        .join(", ");
    let placeholders = vec!["?"; field_infos.len()].join(", ");

    let create_sql = format!(
        "BEGIN;\nCREATE TABLE {} (\n    object_id INTEGER PRIMARY KEY,\n    {}\n);\n\
         INSERT INTO gpkg_contents (table_name, data_type, identifier) VALUES ('{}', 'attributes', '{}');\n\
         COMMIT;",
        table_name,
        column_defs.join(",\n    "),
        table_name,
        table_name
    );
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table_name, column_list, placeholders
    );
    let select_sql = format!(
        "SELECT {} FROM {} ORDER BY object_id",
        column_list, table_name
    );

    let column_names: Vec<Ident> = field_infos
        .iter()
        .map(|i| Ident::new(i.name.as_str(), Span::call_site()))
        .collect();

    let column_nums = (0..column_names.len())
        .map(|i| LitInt::new(&format!("{}usize", i), Span::call_site()))
        .collect::<Vec<LitInt>>();

    quote!(
        impl ::planetcrs::store::CatalogTable for #name {
            #[inline]
            fn table_name() -> &'static str {
                #table_name
            }

            #[inline]
            fn create_sql() -> &'static str {
                #create_sql
            }

            #[inline]
            fn insert_sql() -> &'static str {
                #insert_sql
            }

            #[inline]
            fn select_sql() -> &'static str {
                #select_sql
            }

            fn from_row(row: &::rusqlite::Row) -> ::rusqlite::Result<Self> {
                Ok(Self {
                    #(#column_names: row.get(#column_nums)?,)*
                })
            }

            fn as_params(&self) -> Vec<&dyn ::rusqlite::ToSql> {
                vec![
                    #(&self.#column_names as &dyn ::rusqlite::ToSql),*
                ]
            }
        }
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use quote::quote;

    #[test]
    fn basic_test() {
        let tstream = quote!(
            #[table_name = "datum"]
            struct DatumRecord {
                code: i64,
                name: String,
                #[sql_type = "TEXT"]
                ellipsoid: CrsRef,
                prime_meridian_value: Option<f64>,
            }
        );
        let out = derive_catalog_table_inner(tstream).to_string();
        assert!(out.contains("CatalogTable for DatumRecord"));
        assert!(out.contains("ellipsoid TEXT NOT NULL"));
        assert!(out.contains("prime_meridian_value REAL\\n);"));
        assert!(out.contains("INSERT INTO datum (code, name, ellipsoid, prime_meridian_value) VALUES (?, ?, ?, ?)"));
    }

    #[test]
    fn struct_name_is_default_table_name() {
        let tstream = quote!(
            struct Ellipsoid {
                code: i64,
            }
        );
        let out = derive_catalog_table_inner(tstream).to_string();
        assert!(out.contains("SELECT code FROM Ellipsoid ORDER BY object_id"));
    }

    #[test]
    #[should_panic(expected = "add a sql_type attribute")]
    fn unknown_type_needs_sql_type() {
        let tstream = quote!(
            struct Broken {
                shape: Shape,
            }
        );
        derive_catalog_table_inner(tstream);
    }
}
