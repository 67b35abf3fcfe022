use diesel::sql_types::Text;

// Wraps the unaccent extension in an immutable function so it stays
// index-friendly. Created by the initial migration.
diesel::define_sql_function! {
    fn f_unaccent(x: Text) -> Text;
}
